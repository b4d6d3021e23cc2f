use std::fmt::Display;

use lazy_regex::regex_captures;

/// A pack to export: the set name on the remote side and the directory
/// name it is written to locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackReference {
    pub remote_id: String,
    pub output_id: Option<String>,
}

impl PackReference {
    pub fn new(remote_id: impl Into<String>) -> Self {
        Self {
            remote_id: remote_id.into(),
            output_id: None,
        }
    }
    /// Local id, falling back to the remote id when no override was given.
    pub fn output_id(&self) -> &str {
        self.output_id.as_deref().unwrap_or(&self.remote_id)
    }
}

impl Display for PackReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.output_id {
            Some(out) => write!(f, "{} -> {out}", self.remote_id),
            None => f.write_str(&self.remote_id),
        }
    }
}

/// A token that didn't make it into the resolved list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Neither a pack link nor a usable output id.
    Invalid(String),
    /// The preceding pack already carries an output id.
    DuplicateOverride {
        remote_id: String,
        existing: String,
        ignored: String,
    },
    /// An output id with no pack link before it.
    Orphan(String),
}

#[derive(Debug, Default)]
pub struct Resolution {
    pub packs: Vec<PackReference>,
    pub rejected: Vec<Rejection>,
}

/// Extracts the set name from a `t.me/addstickers` or `t.me/addemoji` link.
pub fn pack_link_id(token: &str) -> Option<&str> {
    let (_, id) = regex_captures!(r"https://t\.me/add(?:emoji|stickers)/([^/\s?#]+)", token)?;
    Some(id)
}

fn is_output_id(token: &str) -> bool {
    !token.is_empty()
        && !token.chars().any(char::is_whitespace)
        && !token.contains(&['/', '\\'][..])
        && token != "."
        && token != ".."
}

/// Turns positional arguments into pack references. A bare token right
/// after a link overrides that link's output id, first override wins.
pub fn resolve<I>(tokens: I) -> Resolution
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut res = Resolution::default();

    for token in tokens {
        let token = token.as_ref();
        match pack_link_id(token) {
            // the set name doubles as directory name when there's no override
            Some(id) if is_output_id(id) => res.packs.push(PackReference::new(id)),
            Some(_) => res.rejected.push(Rejection::Invalid(token.to_owned())),
            None if is_output_id(token) => match res.packs.last_mut() {
                None => res.rejected.push(Rejection::Orphan(token.to_owned())),
                Some(PackReference {
                    remote_id,
                    output_id: Some(existing),
                }) => res.rejected.push(Rejection::DuplicateOverride {
                    remote_id: remote_id.clone(),
                    existing: existing.clone(),
                    ignored: token.to_owned(),
                }),
                Some(pending) => pending.output_id = Some(token.to_owned()),
            },
            None => res.rejected.push(Rejection::Invalid(token.to_owned())),
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_both_link_kinds() {
        assert_eq!(pack_link_id("https://t.me/addstickers/Cats"), Some("Cats"));
        assert_eq!(pack_link_id("https://t.me/addemoji/abcd"), Some("abcd"));
        assert_eq!(pack_link_id("https://t.me/addemoji/"), None);
        assert_eq!(pack_link_id("https://example.com/addemoji/abcd"), None);
        assert_eq!(pack_link_id("abcd"), None);
        assert_eq!(pack_link_id("https://t.me/addstickers/Cats?start=1"), Some("Cats"));
        assert_eq!(pack_link_id("https://t.me/addstickers/Cats/extra"), Some("Cats"));
    }

    #[test]
    fn link_ids_that_escape_the_out_dir_are_invalid() {
        let res = resolve([
            "https://t.me/addemoji/../escape",
            "https://t.me/addemoji/..",
            "https://t.me/addstickers/.",
            "custom",
        ]);
        assert!(res.packs.is_empty());
        assert_eq!(
            res.rejected,
            vec![
                Rejection::Invalid("https://t.me/addemoji/../escape".into()),
                Rejection::Invalid("https://t.me/addemoji/..".into()),
                Rejection::Invalid("https://t.me/addstickers/.".into()),
                Rejection::Orphan("custom".into()),
            ]
        );
    }

    #[test]
    fn bare_token_overrides_preceding_link() {
        let res = resolve(["https://t.me/addemoji/abcd", "custom"]);
        assert_eq!(
            res.packs,
            vec![PackReference {
                remote_id: "abcd".into(),
                output_id: Some("custom".into()),
            }]
        );
        assert!(res.rejected.is_empty());
        assert_eq!(res.packs[0].output_id(), "custom");
    }

    #[test]
    fn output_id_defaults_to_remote_id() {
        let res = resolve(["https://t.me/addstickers/one", "https://t.me/addstickers/two"]);
        let ids = res.packs.iter().map(|p| p.output_id()).collect::<Vec<_>>();
        assert_eq!(ids, ["one", "two"]);
    }

    #[test]
    fn first_override_wins() {
        let res = resolve(["https://t.me/addemoji/abcd", "first", "second"]);
        assert_eq!(res.packs[0].output_id(), "first");
        assert_eq!(
            res.rejected,
            vec![Rejection::DuplicateOverride {
                remote_id: "abcd".into(),
                existing: "first".into(),
                ignored: "second".into(),
            }]
        );
    }

    #[test]
    fn override_without_link_is_rejected() {
        let res = resolve(["lonely", "https://t.me/addemoji/abcd"]);
        assert_eq!(res.rejected, vec![Rejection::Orphan("lonely".into())]);
        assert_eq!(res.packs[0].output_id(), "abcd");
    }

    #[test]
    fn whitespace_and_paths_are_invalid() {
        let res = resolve([
            "https://t.me/addemoji/abcd",
            "has space",
            "tab\there",
            "../escape",
            "..",
        ]);
        assert_eq!(res.packs[0].output_id, None);
        assert_eq!(
            res.rejected,
            vec![
                Rejection::Invalid("has space".into()),
                Rejection::Invalid("tab\there".into()),
                Rejection::Invalid("../escape".into()),
                Rejection::Invalid("..".into()),
            ]
        );
    }

    #[test]
    fn empty_input_resolves_nothing() {
        let res = resolve(Vec::<String>::new());
        assert!(res.packs.is_empty());
        assert!(res.rejected.is_empty());
    }
}
