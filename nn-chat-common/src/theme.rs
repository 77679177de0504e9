use std::fmt::{Display, Formatter};

pub const THEME_COOKIE_NAME: &str = "currentTheme";

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The theme to display for a stored cookie value. Anything but `dark` is light.
    #[must_use]
    pub fn from_cookie(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// The value the toggle action stores: exactly `light` becomes dark, all
    /// else (including absent and unknown values) becomes light.
    #[must_use]
    pub fn toggled_from_cookie(value: Option<&str>) -> Self {
        match value {
            Some("light") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use crate::theme::Theme;

    #[test]
    fn from_cookie() {
        assert_eq!(Theme::from_cookie(None), Theme::Light);
        assert_eq!(Theme::from_cookie(Some("light")), Theme::Light);
        assert_eq!(Theme::from_cookie(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_cookie(Some("DARK")), Theme::Light);
        assert_eq!(Theme::from_cookie(Some("")), Theme::Light);
    }

    #[test]
    fn toggle() {
        assert_eq!(Theme::toggled_from_cookie(Some("light")), Theme::Dark);
        assert_eq!(Theme::toggled_from_cookie(Some("dark")), Theme::Light);
        assert_eq!(Theme::toggled_from_cookie(None), Theme::Light);
        assert_eq!(Theme::toggled_from_cookie(Some("sepia")), Theme::Light);
    }
}
