//! Template-based email drafter.
//!
//! Deterministic implementation of the EmailDrafter port. Round 1 gets the
//! first follow-up, later incomplete rounds get the shorter partial
//! follow-up, and complete records get a thank-you with the full summary.

use async_trait::async_trait;

use super::templates::LanguagePack;
use crate::domain::event::{EmailMode, EmailModeKind, EventFields, FieldKey, OutboundEmail, FIRST_ROUND};
use crate::ports::{DraftError, DraftRequest, EmailDrafter};

const DEFAULT_SIGNATURE: &str = "The Event Planning Team";

/// Renders outbound emails from localised templates.
#[derive(Debug, Clone)]
pub struct TemplateEmailDrafter {
    signature: String,
}

impl Default for TemplateEmailDrafter {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNATURE)
    }
}

impl TemplateEmailDrafter {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
        }
    }

    /// Renders the email for a request.
    pub fn render(&self, request: &DraftRequest) -> OutboundEmail {
        let pack = LanguagePack::for_language(request.language);
        match &request.mode {
            EmailMode::RequestMoreInfo { missing_fields } => {
                self.render_follow_up(pack, request, missing_fields)
            }
            EmailMode::ThankYou { fields } => self.render_thank_you(pack, request, fields),
        }
    }

    fn render_follow_up(
        &self,
        pack: &LanguagePack,
        request: &DraftRequest,
        missing_fields: &[FieldKey],
    ) -> OutboundEmail {
        let first = request.round_number <= FIRST_ROUND;
        let (subject, intro, outro) = if first {
            (pack.first_subject, pack.first_intro, pack.first_outro)
        } else {
            (pack.partial_subject, pack.partial_intro, pack.partial_outro)
        };

        let mut body = greeting(pack, request.first_name.as_deref());
        body.push_str("\n\n");
        body.push_str(intro);
        body.push_str("\n\n");
        for key in missing_fields {
            body.push_str(&format!("• {}\n", pack.label(*key)));
        }
        body.push('\n');
        body.push_str(pack.questions_heading);
        body.push_str("\n\n");
        for key in missing_fields {
            body.push_str(&format!("- {}\n", pack.question(*key)));
        }
        body.push('\n');
        body.push_str(outro);
        self.sign(pack, &mut body);

        OutboundEmail {
            mode: EmailModeKind::RequestMoreInfo,
            subject: format!("{} ({})", subject, request.event_id),
            body,
        }
    }

    fn render_thank_you(
        &self,
        pack: &LanguagePack,
        request: &DraftRequest,
        fields: &EventFields,
    ) -> OutboundEmail {
        let mut body = greeting(pack, request.first_name.as_deref());
        body.push_str("\n\n");
        body.push_str(pack.thank_you_intro);
        body.push_str("\n\n");
        for (key, value) in fields.iter() {
            body.push_str(&format!("{}: {}\n", pack.label(key), value));
        }
        body.push('\n');
        body.push_str(pack.thank_you_outro);
        self.sign(pack, &mut body);

        OutboundEmail {
            mode: EmailModeKind::ThankYou,
            subject: format!("{} ({})", pack.thank_you_subject, request.event_id),
            body,
        }
    }

    fn sign(&self, pack: &LanguagePack, body: &mut String) {
        body.push_str("\n\n");
        body.push_str(pack.closing);
        body.push('\n');
        body.push_str(&self.signature);
    }
}

fn greeting(pack: &LanguagePack, first_name: Option<&str>) -> String {
    match first_name.filter(|n| !n.is_empty()) {
        Some(name) => pack.greeting.replace("{name}", name),
        None if pack.anonymous.is_empty() => pack.greeting.replace(" {name}", ""),
        None => pack.greeting.replace("{name}", pack.anonymous),
    }
}

#[async_trait]
impl EmailDrafter for TemplateEmailDrafter {
    async fn draft(&self, request: DraftRequest) -> Result<OutboundEmail, DraftError> {
        if let EmailMode::RequestMoreInfo { missing_fields } = &request.mode {
            if missing_fields.is_empty() {
                return Err(DraftError::rendering("follow-up without missing fields"));
            }
        }
        Ok(self.render(&request))
    }
}
