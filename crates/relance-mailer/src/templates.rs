//! Fixed email templates. Each renders a subject plus an HTML and a
//! plain-text body; the caller supplies the already-built questionnaire
//! link.

/// Rendered subject/body pair for one template.
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Initial invitation sent to the patient by the delivery sweep.
pub fn invitation(title: &str, link: &str) -> RenderedEmail {
    RenderedEmail {
        subject: format!("Your practitioner would like your feedback — {title}"),
        html: format!(
            "<div style=\"font-family:sans-serif;max-width:540px;margin:0 auto\">\
             <h2>How did it go?</h2>\
             <p>Your practitioner sent you a short questionnaire about \
             <strong>{title}</strong>. It takes less than two minutes and the \
             link is valid for a limited time.</p>\
             <p style=\"margin:24px 0\">\
             <a href=\"{link}\" style=\"background:#2563eb;color:#fff;\
             padding:12px 24px;border-radius:6px;text-decoration:none\">\
             Answer the questionnaire</a></p>\
             <p style=\"color:#6b7280;font-size:13px\">If the button does not \
             work, copy this link: {link}</p>\
             </div>"
        ),
        text: format!(
            "Your practitioner sent you a short questionnaire about {title}.\n\
             It takes less than two minutes and the link is valid for a \
             limited time.\n\nAnswer here: {link}\n"
        ),
    }
}

/// One-shot reminder for patients who have not answered.
pub fn reminder(title: &str, link: &str) -> RenderedEmail {
    RenderedEmail {
        subject: format!("Reminder: your feedback on {title}"),
        html: format!(
            "<div style=\"font-family:sans-serif;max-width:540px;margin:0 auto\">\
             <h2>A quick reminder</h2>\
             <p>You recently received a questionnaire about \
             <strong>{title}</strong> and have not answered yet. It is still \
             open, but not for long.</p>\
             <p style=\"margin:24px 0\">\
             <a href=\"{link}\" style=\"background:#2563eb;color:#fff;\
             padding:12px 24px;border-radius:6px;text-decoration:none\">\
             Answer the questionnaire</a></p>\
             </div>"
        ),
        text: format!(
            "You recently received a questionnaire about {title} and have \
             not answered yet. It is still open, but not for long.\n\n\
             Answer here: {link}\n"
        ),
    }
}

/// Critical low-score alert to the practitioner. Visually distinct from the
/// routine notification.
pub fn low_score_alert(
    practitioner_name: &str,
    title: &str,
    score_total: u8,
    average_score: f64,
) -> RenderedEmail {
    RenderedEmail {
        subject: format!("\u{26a0} Low satisfaction score ({score_total}/5) — {title}"),
        html: format!(
            "<div style=\"font-family:sans-serif;max-width:540px;margin:0 auto;\
             border:2px solid #dc2626;border-radius:8px;padding:16px\">\
             <h2 style=\"color:#dc2626\">Low score alert</h2>\
             <p>Hello {practitioner_name},</p>\
             <p>A patient just rated <strong>{title}</strong> \
             <strong style=\"color:#dc2626\">{score_total}/5</strong> \
             (average {average_score:.2}). You may want to follow up \
             directly.</p>\
             <p>Details are on your dashboard.</p>\
             </div>"
        ),
        text: format!(
            "LOW SCORE ALERT\n\nHello {practitioner_name},\n\nA patient just \
             rated {title} {score_total}/5 (average {average_score:.2}). You \
             may want to follow up directly.\n\nDetails are on your \
             dashboard.\n"
        ),
    }
}

/// Routine notification that a new response arrived, regardless of score.
pub fn new_response(practitioner_name: &str, title: &str) -> RenderedEmail {
    RenderedEmail {
        subject: format!("New response received — {title}"),
        html: format!(
            "<div style=\"font-family:sans-serif;max-width:540px;margin:0 auto\">\
             <p>Hello {practitioner_name},</p>\
             <p>A patient just answered your questionnaire \
             <strong>{title}</strong>. The response is on your dashboard.</p>\
             </div>"
        ),
        text: format!(
            "Hello {practitioner_name},\n\nA patient just answered your \
             questionnaire {title}. The response is on your dashboard.\n"
        ),
    }
}
