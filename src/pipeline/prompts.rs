pub const APPLICATION: &str = "Plentiful Providers - Food Pantry Management System";
pub const USERS: &str = "Food pantry staff, volunteers, and administrators";
pub const AUDIENCE: &str =
    "Community members seeking food assistance (referred to as 'neighbors')";

pub const GUIDE_USE_NEIGHBORS: &str =
    "Use 'neighbors' instead of 'clients' for service recipients";
pub const GUIDE_TONE: &str = "Professional but warm and welcoming";
pub const GUIDE_ACCESSIBILITY: &str = "Ensure clarity for diverse communities";
pub const GUIDE_PRESERVE_VARIABLES: &str = "Keep all placeholder variables exactly, character for character including casing (e.g., {{var_1}}, {{senior_age_threshold}})";
pub const GUIDE_FORMATTING: &str = "Maintain punctuation and formatting";
pub const GUIDE_UI_CONSTRAINTS: &str = "Keep button text concise for interface constraints";

pub const INSTRUCTIONS: &str = "Translate ONLY the 'text_to_translate' field to the target language. Return only the translated text, nothing else.";

pub const SYSTEM_PROMPT: &str = r#"You are a professional translator for Plentiful Providers, a food pantry management system.

Key features include:
- Neighbor check-in and household management
- Appointment scheduling and reservations
- Messaging system for service updates
- TEFAP (emergency food assistance) compliance
- Service capacity management and reporting

When you receive a JSON input with translation request, extract the 'text_to_translate' field and translate it according to the provided context and guidelines. Return ONLY the translated text."#;

pub const MESSAGE_TEMPLATE: &str = r#"Please translate the following JSON request:

{{request_json}}

Return ONLY the translated text, nothing else."#;

pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        let pat = format!("{{{{{k}}}}}");
        out = out.replace(&pat, v);
    }
    out
}
