//! Labels shown by the control panel and the XPath expressions locating them.

use okofen_app::ports::Indicator;
use okofen_domain::mode::Mode;

pub const LOGIN_PATH: &str = "/login.cgi";
pub const HOME_PATH: &str = "/";

/// Language row that marks the login page as loaded.
pub const LANGUAGE_ROW: &str = "Francais";
pub const USERNAME_LABEL: &str = "Identifiant:";
pub const PASSWORD_LABEL: &str = "Mot de passe:";
pub const LOGIN_BUTTON: &str = "Accès";
pub const HEATING_CIRCUIT_LINK: &str = "Chf1 Chauffage";
/// Text that marks the heating circuit page as loaded.
pub const HEATING_CIRCUIT_MARKER: &str = "Nom du circuitChauffage";
pub const CONFIRM_BUTTON: &str = "OK";
pub const HOME_LINK: &str = "Home";

/// Text of the mode indicator at the top of the heating circuit page.
#[must_use]
pub fn indicator_label(indicator: Indicator) -> &'static str {
    match indicator {
        Indicator::Auto => "ModeAuto",
        Indicator::Stop => "ModeArrêt",
    }
}

/// Label of the mode selector button choosing `mode`.
#[must_use]
pub fn mode_button_label(mode: Mode) -> &'static str {
    match mode {
        Mode::On => "Auto",
        Mode::Off => "Arrêt",
    }
}

/// Innermost elements whose normalised text contains `text`.
#[must_use]
pub fn text(text: &str) -> String {
    let lit = literal(text);
    format!(
        "//*[contains(normalize-space(.), {lit}) and not(*[contains(normalize-space(.), {lit})])]"
    )
}

/// Buttons (or button-like inputs) labelled exactly `label`.
#[must_use]
pub fn button(label: &str) -> String {
    let lit = literal(label);
    format!(
        "//button[normalize-space(.)={lit}] | //input[(@type='button' or @type='submit') and normalize-space(@value)={lit}]"
    )
}

/// Buttons (or button-like inputs) whose label contains `label`.
#[must_use]
pub fn button_containing(label: &str) -> String {
    let lit = literal(label);
    format!(
        "//button[contains(normalize-space(.), {lit})] | //input[(@type='button' or @type='submit') and contains(normalize-space(@value), {lit})]"
    )
}

/// Mode selector button choosing `mode`.
///
/// "Arrêt" must match exactly; the "Auto" label may carry extra text.
#[must_use]
pub fn mode_button(mode: Mode) -> String {
    match mode {
        Mode::On => button_containing(mode_button_label(mode)),
        Mode::Off => button(mode_button_label(mode)),
    }
}

/// Links whose text contains `label`.
#[must_use]
pub fn link(label: &str) -> String {
    format!("//a[contains(normalize-space(.), {})]", literal(label))
}

/// Table rows whose text contains `text`.
#[must_use]
pub fn row(text: &str) -> String {
    format!("//tr[contains(normalize-space(.), {})]", literal(text))
}

/// First input following the element labelled exactly `label`.
#[must_use]
pub fn input_after_label(label: &str) -> String {
    let lit = literal(label);
    format!("//*[normalize-space(text())={lit}]/following::input[1] | //input[@id=//label[normalize-space(.)={lit}]/@for]")
}

/// Quote `value` as an XPath 1.0 string literal.
fn literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{value}'")
    } else if !value.contains('"') {
        format!("\"{value}\"")
    } else {
        let parts: Vec<String> = value.split('\'').map(|part| format!("'{part}'")).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
