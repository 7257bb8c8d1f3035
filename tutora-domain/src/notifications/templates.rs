use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::notifications::types::{
    ActionButton, ActionStyle, NotificationCategory, NotificationKind,
};

/// Message template for one notification kind. Title and description may
/// contain `{placeholder}` tokens resolved against the creation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub target_page: &'static str,
    pub category: NotificationCategory,
}

/// Template lookup, one entry per kind.
pub fn template_for(kind: NotificationKind) -> NotificationTemplate {
    use NotificationCategory::{Academic, Administrative, Payment, Schedule};
    use NotificationKind::*;

    match kind {
        PaymentDue => NotificationTemplate {
            title: "Paiement en attente",
            description: "Le paiement de {amount} FCFA pour {studentName} est dû le {dueDate}",
            target_page: "/parent/payments",
            category: Payment,
        },
        PaymentReminder => NotificationTemplate {
            title: "Rappel de paiement",
            description: "N'oubliez pas le paiement de {amount} FCFA pour {studentName}",
            target_page: "/parent/payments",
            category: Payment,
        },
        PaymentConfirmed => NotificationTemplate {
            title: "Paiement confirmé",
            description: "Votre paiement de {amount} FCFA a été confirmé",
            target_page: "/parent/payments",
            category: Payment,
        },
        PaymentReceived => NotificationTemplate {
            title: "Paiement reçu",
            description: "Paiement de {amount} FCFA reçu de {parentName}",
            target_page: "/direction/finances",
            category: Payment,
        },
        PaymentOverdue => NotificationTemplate {
            title: "Paiement en retard",
            description: "Le paiement de {amount} FCFA pour {studentName} est en retard de {daysLate} jours",
            target_page: "/parent/payments",
            category: Payment,
        },
        SalaryPaid => NotificationTemplate {
            title: "Salaire versé",
            description: "Votre salaire de {amount} FCFA pour {period} a été versé",
            target_page: "/teacher/payments",
            category: Payment,
        },
        SessionReminder => NotificationTemplate {
            title: "Rappel de séance",
            description: "Séance avec {studentName} le {date} à {time}",
            target_page: "/teacher/sessions",
            category: Schedule,
        },
        SessionCancelled => NotificationTemplate {
            title: "Séance annulée",
            description: "La séance du {date} avec {studentName} a été annulée",
            target_page: "/teacher/sessions",
            category: Schedule,
        },
        SessionValidated => NotificationTemplate {
            title: "Séance validée",
            description: "Votre séance du {date} avec {studentName} a été validée",
            target_page: "/teacher/sessions",
            category: Schedule,
        },
        UrgentReplacement => NotificationTemplate {
            title: "Remplacement urgent",
            description: "Remplacement recherché pour {studentName} le {date} à {time}",
            target_page: "/teacher/replacements",
            category: Schedule,
        },
        ScheduleChanged => NotificationTemplate {
            title: "Emploi du temps modifié",
            description: "Le planning de {studentName} a été modifié",
            target_page: "/schedule",
            category: Schedule,
        },
        // Goes to the direction and the assigned teachers, so the route is
        // role-neutral.
        BulletinUploaded => NotificationTemplate {
            title: "Bulletin déposé",
            description: "Le bulletin de {studentName} ({period}) a été déposé",
            target_page: "/bulletins",
            category: Academic,
        },
        BulletinAvailable => NotificationTemplate {
            title: "Bulletin disponible",
            description: "Le bulletin de {studentName} pour {period} est disponible",
            target_page: "/parent/bulletins",
            category: Academic,
        },
        GradePublished => NotificationTemplate {
            title: "Note publiée",
            description: "Nouvelle note en {subject} pour {studentName}: {grade}",
            target_page: "/parent/grades",
            category: Academic,
        },
        ParentRegistered => NotificationTemplate {
            title: "Nouveau parent inscrit",
            description: "{parentName} s'est inscrit avec {childCount} enfant(s)",
            target_page: "/direction/parents",
            category: Administrative,
        },
        TeacherRegistered => NotificationTemplate {
            title: "Nouvel enseignant inscrit",
            description: "{teacherName} s'est inscrit ({subjects})",
            target_page: "/direction/teachers",
            category: Administrative,
        },
        ContractSigned => NotificationTemplate {
            title: "Contrat signé",
            description: "Le contrat {contractCode} a été signé par {parentName}",
            target_page: "/direction/contracts",
            category: Administrative,
        },
        ContractAssigned => NotificationTemplate {
            title: "Contrat attribué",
            description: "Le contrat {contractCode} pour {studentName} vous a été attribué",
            target_page: "/teacher/contracts",
            category: Administrative,
        },
        ContractExpiring => NotificationTemplate {
            title: "Contrat {contractCode}",
            description: "Le contrat {contractCode} expire le {endDate}",
            target_page: "/direction/contracts",
            category: Administrative,
        },
    }
}

/// Action buttons attached at creation, keyed by kind. Most kinds carry
/// none; the table is fixed and not rule-configurable.
pub fn action_buttons_for(kind: NotificationKind) -> Vec<ActionButton> {
    use NotificationKind::*;

    match kind {
        PaymentDue | PaymentReminder => vec![
            ActionButton::new("Payer maintenant", "pay_now", ActionStyle::Default),
            ActionButton::new("Voir détails", "view_details", ActionStyle::Default),
        ],
        SessionCancelled => vec![
            ActionButton::new("Reprogrammer", "reschedule", ActionStyle::Default),
            ActionButton::new("OK", "dismiss", ActionStyle::Cancel),
        ],
        UrgentReplacement => vec![
            ActionButton::new("Accepter", "accept", ActionStyle::Default),
            ActionButton::new("Refuser", "decline", ActionStyle::Destructive),
        ],
        _ => Vec::new(),
    }
}

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex is valid"));

/// Substitutes `{key}` tokens in `pattern` with values from `data`.
/// Tokens without a matching key are left in the output verbatim.
pub fn render(pattern: &str, data: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(pattern, |caps: &regex::Captures<'_>| {
            data.get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
