//! Localised wording for drafted emails.

use crate::domain::event::FieldKey;
use crate::domain::foundation::Language;

/// All wording used by the template drafter for one language.
#[derive(Debug)]
pub struct LanguagePack {
    /// Greeting with a `{name}` placeholder.
    pub greeting: &'static str,
    /// Used in the greeting when the client's name is unknown.
    pub anonymous: &'static str,
    pub first_subject: &'static str,
    pub first_intro: &'static str,
    pub partial_subject: &'static str,
    pub partial_intro: &'static str,
    pub questions_heading: &'static str,
    pub first_outro: &'static str,
    pub partial_outro: &'static str,
    pub thank_you_subject: &'static str,
    pub thank_you_intro: &'static str,
    pub thank_you_outro: &'static str,
    pub closing: &'static str,
    /// Label and question per field, in schema order.
    fields: [(&'static str, &'static str); 11],
}

impl LanguagePack {
    pub fn for_language(language: Language) -> &'static LanguagePack {
        match language {
            Language::English => &ENGLISH,
            Language::Spanish => &SPANISH,
            Language::German => &GERMAN,
            Language::French => &FRENCH,
        }
    }

    pub fn label(&self, key: FieldKey) -> &'static str {
        self.fields[Self::index(key)].0
    }

    pub fn question(&self, key: FieldKey) -> &'static str {
        self.fields[Self::index(key)].1
    }

    /// Position of the key in schema order.
    fn index(key: FieldKey) -> usize {
        key as usize
    }
}

static ENGLISH: LanguagePack = LanguagePack {
    greeting: "Hi {name},",
    anonymous: "there",
    first_subject: "Your event request: a few more details",
    first_intro: "Thank you for your event request! To prepare venue recommendations for you, we still need the following details:",
    partial_subject: "Your event request: almost there",
    partial_intro: "Thank you for the additional information. A few details are still missing before we can complete your venue search:",
    questions_heading: "Could you let us know:",
    first_outro: "Once we have this information, we will send you tailored venue options and planning recommendations.",
    partial_outro: "With these final details we can send you venue recommendations that match your requirements.",
    thank_you_subject: "Your event request is complete",
    thank_you_intro: "Thank you for providing all the details for your event. Here is a summary of what we have:",
    thank_you_outro: "Our team is now preparing venue options that fit your requirements and budget. You can expect our recommendations within 24 hours.",
    closing: "Warm regards,",
    fields: [
        ("Full name", "What is your full name?"),
        ("Email", "What email address can we reach you at?"),
        ("Phone", "What phone number can we reach you at?"),
        ("Location", "Where will the event take place?"),
        ("Event name", "What is the name of the event?"),
        ("Event type", "What type of event is it (conference, workshop, retreat, ...)?"),
        ("Attendees", "How many attendees do you expect?"),
        ("Sleeping rooms", "How many sleeping rooms will you need?"),
        ("Budget", "What is your budget for the event?"),
        ("Start date", "On what date does the event start?"),
        ("End date", "On what date does the event end?"),
    ],
};

static SPANISH: LanguagePack = LanguagePack {
    greeting: "Hola {name}:",
    anonymous: "",
    first_subject: "Su solicitud de evento: algunos detalles más",
    first_intro: "¡Gracias por su solicitud de evento! Para preparar recomendaciones de sedes necesitamos todavía los siguientes datos:",
    partial_subject: "Su solicitud de evento: casi lista",
    partial_intro: "Gracias por la información adicional. Aún faltan algunos datos para completar la búsqueda de sedes:",
    questions_heading: "¿Podría indicarnos lo siguiente?",
    first_outro: "En cuanto tengamos esta información le enviaremos opciones de sedes y recomendaciones a su medida.",
    partial_outro: "Con estos últimos datos podremos enviarle recomendaciones de sedes que se ajusten a sus necesidades.",
    thank_you_subject: "Su solicitud de evento está completa",
    thank_you_intro: "Gracias por facilitarnos todos los datos de su evento. Este es el resumen de lo que tenemos:",
    thank_you_outro: "Nuestro equipo ya está preparando opciones de sedes acordes con sus requisitos y presupuesto. Recibirá nuestras recomendaciones en un plazo de 24 horas.",
    closing: "Saludos cordiales,",
    fields: [
        ("Nombre completo", "¿Cuál es su nombre completo?"),
        ("Correo electrónico", "¿En qué correo electrónico podemos contactarle?"),
        ("Teléfono", "¿En qué número de teléfono podemos contactarle?"),
        ("Ubicación", "¿Dónde se celebrará el evento?"),
        ("Nombre del evento", "¿Cómo se llama el evento?"),
        ("Tipo de evento", "¿Qué tipo de evento es (conferencia, taller, retiro, ...)?"),
        ("Asistentes", "¿Cuántos asistentes espera?"),
        ("Habitaciones", "¿Cuántas habitaciones de hotel necesitará?"),
        ("Presupuesto", "¿Cuál es el presupuesto del evento?"),
        ("Fecha de inicio", "¿En qué fecha empieza el evento?"),
        ("Fecha de fin", "¿En qué fecha termina el evento?"),
    ],
};

static GERMAN: LanguagePack = LanguagePack {
    greeting: "Hallo {name},",
    anonymous: "",
    first_subject: "Ihre Veranstaltungsanfrage: noch einige Angaben",
    first_intro: "Vielen Dank für Ihre Veranstaltungsanfrage! Damit wir passende Locations empfehlen können, benötigen wir noch folgende Angaben:",
    partial_subject: "Ihre Veranstaltungsanfrage: fast geschafft",
    partial_intro: "Vielen Dank für die zusätzlichen Informationen. Für die Locationsuche fehlen uns noch einige Angaben:",
    questions_heading: "Könnten Sie uns Folgendes mitteilen?",
    first_outro: "Sobald uns diese Informationen vorliegen, senden wir Ihnen passende Locations und Planungsempfehlungen.",
    partial_outro: "Mit diesen letzten Angaben können wir Ihnen Locations empfehlen, die genau zu Ihren Anforderungen passen.",
    thank_you_subject: "Ihre Veranstaltungsanfrage ist vollständig",
    thank_you_intro: "Vielen Dank für alle Angaben zu Ihrer Veranstaltung. Hier eine Zusammenfassung:",
    thank_you_outro: "Unser Team stellt jetzt passende Locations für Ihre Anforderungen und Ihr Budget zusammen. Sie erhalten unsere Empfehlungen innerhalb von 24 Stunden.",
    closing: "Mit freundlichen Grüßen,",
    fields: [
        ("Vollständiger Name", "Wie lautet Ihr vollständiger Name?"),
        ("E-Mail", "Unter welcher E-Mail-Adresse erreichen wir Sie?"),
        ("Telefon", "Unter welcher Telefonnummer erreichen wir Sie?"),
        ("Ort", "Wo soll die Veranstaltung stattfinden?"),
        ("Name der Veranstaltung", "Wie heißt die Veranstaltung?"),
        ("Art der Veranstaltung", "Um welche Art von Veranstaltung handelt es sich (Konferenz, Workshop, Klausur, ...)?"),
        ("Teilnehmer", "Mit wie vielen Teilnehmern rechnen Sie?"),
        ("Hotelzimmer", "Wie viele Hotelzimmer benötigen Sie?"),
        ("Budget", "Welches Budget steht für die Veranstaltung zur Verfügung?"),
        ("Beginn", "An welchem Datum beginnt die Veranstaltung?"),
        ("Ende", "An welchem Datum endet die Veranstaltung?"),
    ],
};

static FRENCH: LanguagePack = LanguagePack {
    greeting: "Bonjour {name},",
    anonymous: "",
    first_subject: "Votre demande d'événement : quelques précisions",
    first_intro: "Merci pour votre demande d'événement ! Pour vous proposer des lieux adaptés, il nous manque encore les informations suivantes :",
    partial_subject: "Votre demande d'événement : presque terminée",
    partial_intro: "Merci pour ces informations complémentaires. Il nous manque encore quelques éléments pour finaliser la recherche de lieux :",
    questions_heading: "Pourriez-vous nous indiquer :",
    first_outro: "Dès réception de ces informations, nous vous enverrons des propositions de lieux et des recommandations sur mesure.",
    partial_outro: "Avec ces derniers éléments, nous pourrons vous envoyer des lieux correspondant à vos besoins.",
    thank_you_subject: "Votre demande d'événement est complète",
    thank_you_intro: "Merci de nous avoir transmis toutes les informations sur votre événement. Voici le récapitulatif :",
    thank_you_outro: "Notre équipe prépare dès maintenant des propositions de lieux adaptées à vos besoins et à votre budget. Vous recevrez nos recommandations sous 24 heures.",
    closing: "Bien cordialement,",
    fields: [
        ("Nom complet", "Quel est votre nom complet ?"),
        ("E-mail", "À quelle adresse e-mail pouvons-nous vous joindre ?"),
        ("Téléphone", "À quel numéro pouvons-nous vous joindre ?"),
        ("Lieu", "Où l'événement aura-t-il lieu ?"),
        ("Nom de l'événement", "Quel est le nom de l'événement ?"),
        ("Type d'événement", "De quel type d'événement s'agit-il (conférence, atelier, séminaire, ...) ?"),
        ("Participants", "Combien de participants attendez-vous ?"),
        ("Chambres", "Combien de chambres d'hôtel vous faudra-t-il ?"),
        ("Budget", "Quel est le budget de l'événement ?"),
        ("Date de début", "À quelle date commence l'événement ?"),
        ("Date de fin", "À quelle date se termine l'événement ?"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_a_pack_with_name_placeholder() {
        for language in Language::ALL {
            let pack = LanguagePack::for_language(language);
            assert!(pack.greeting.contains("{name}"), "{}", language);
            for key in FieldKey::ALL {
                assert!(!pack.label(key).is_empty());
                assert!(pack.question(key).ends_with('?'));
            }
        }
    }

    #[test]
    fn questions_follow_schema_order() {
        let pack = LanguagePack::for_language(Language::English);
        assert_eq!(pack.question(FieldKey::Budget), "What is your budget for the event?");
        assert_eq!(pack.label(FieldKey::EventEndDate), "End date");
    }
}
