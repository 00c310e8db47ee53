//! Email drafting adapters.
//!
//! - `TemplateEmailDrafter` - localised templates for all supported languages

mod template_drafter;
mod templates;

pub use template_drafter::TemplateEmailDrafter;
pub use templates::LanguagePack;
