/// Who is joining the waitlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Client,
    Restaurateur,
    Boutique,
}

impl UserType {
    /// Parses the value sent by the form (`client`, `restaurateur` or `boutique`).
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim() {
            "client" => Ok(Self::Client),
            "restaurateur" => Ok(Self::Restaurateur),
            "boutique" => Ok(Self::Boutique),
            other => Err(format!("{:?} is not a known user type.", other)),
        }
    }

    /// The wire value, as the form sends it.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Client => "client",
            UserType::Restaurateur => "restaurateur",
            UserType::Boutique => "boutique",
        }
    }

    /// Human readable label used in notifications.
    pub fn label(&self) -> &'static str {
        match self {
            UserType::Client => "Client",
            UserType::Restaurateur => "Restaurateur",
            UserType::Boutique => "Boutique",
        }
    }
}
