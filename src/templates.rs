use handlebars::Handlebars;
use std::sync::Arc;

pub type Hbs = Arc<Handlebars<'static>>;

const THRESHOLD_ALERT: &str = include_str!("../templates/mail/threshold_alert.hbs");
const SPIKE_ALERT: &str = include_str!("../templates/mail/spike_alert.hbs");

pub fn build_handlebars() -> Result<Hbs, handlebars::TemplateError> {
    let mut hb = Handlebars::new();

    // mail bodies are plain text
    hb.register_escape_fn(handlebars::no_escape);
    hb.set_strict_mode(true);

    hb.register_template_string("mail/threshold_alert", THRESHOLD_ALERT)?;
    hb.register_template_string("mail/spike_alert", SPIKE_ALERT)?;

    Ok(Arc::new(hb))
}
