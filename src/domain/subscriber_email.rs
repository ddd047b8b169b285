/// Characters allowed in the local part besides ASCII letters and digits.
const LOCAL_SYMBOLS: &str = ".!#$%&'*+/=?^_`{|}~-";

/// Longest allowed domain label.
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A syntactically valid email address, trimmed of surrounding whitespace.
///
/// Must be instantiated with `SubscriberEmail::parse`. Parsing is a filter on
/// shape only: a parsed address is not guaranteed to be deliverable.
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Accepts `local@domain.tld`, where:
    /// - `local` is non-empty, made of ASCII alphanumerics and `LOCAL_SYMBOLS`
    /// - the domain has at least two `.`-separated labels, each 1-63 ASCII
    ///   alphanumerics or hyphens, not starting or ending with a hyphen
    pub fn parse(email: String) -> Result<Self, String> {
        let trimmed = email.trim();
        let (local, domain) = trimmed
            .split_once('@')
            .ok_or(format!("Invalid email: {email:?}"))?;

        match valid_local_part(local) && valid_domain(domain) {
            true => Ok(Self(trimmed.to_string())),
            false => Err(format!("Invalid email: {email:?}")),
        }
    }
}

fn valid_local_part(local: &str) -> bool {
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || LOCAL_SYMBOLS.contains(c))
}

fn valid_domain(domain: &str) -> bool {
    // a second `@` lands here and is rejected by the label check
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| valid_label(l))
}

fn valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str { &self.0 }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
