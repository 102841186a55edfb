//! Parsing of the `add` command into a strat announcement.

use std::fmt;

/// A parsed strat submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strat<'a> {
    pub link: &'a str,
    pub name: &'a str,
    pub location: &'a str,
    pub category: &'a str,
    /// Explicit author(s); `None` means "whoever submitted it".
    pub author: Option<&'a str>,
}

/// Why a strat submission was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StratError {
    /// Fewer than four comma-separated parts.
    WrongPartCount(usize),
    /// The first part has no link in it.
    MissingLink,
}

impl fmt::Display for StratError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StratError::WrongPartCount(n) => write!(f, "expected 4 or 5 parts, got {n}"),
            StratError::MissingLink => write!(f, "missing link"),
        }
    }
}

impl std::error::Error for StratError {}

/// Parse `<link>, <strat name>, <location>, <category>[, <author(s)>]`.
///
/// Parts are separated by `", "` and everything after the fourth separator
/// belongs to the author.
pub fn parse(args: &str) -> Result<Strat<'_>, StratError> {
    let parts: Vec<&str> = args.splitn(5, ", ").collect();

    if parts.len() < 4 {
        return Err(StratError::WrongPartCount(parts.len()));
    }

    let link = parts[0].split_whitespace().next().ok_or(StratError::MissingLink)?;

    Ok(Strat {
        link,
        name: parts[1],
        location: parts[2],
        category: parts[3],
        author: parts.get(4).copied(),
    })
}

impl Strat<'_> {
    /// Render the announcement, crediting `submitter` when no author was given.
    pub fn announcement(&self, submitter: &str) -> String {
        let author = self.author.unwrap_or(submitter);
        format!("[{}]({}), in {} for {} by {}", self.name, self.link, self.location, self.category, author)
    }
}

/// The reply for any malformed submission.
pub fn usage(bot_user_id: u64) -> String {
    format!("Proper usage: <@{bot_user_id}> add <link>, <strat name>, <location>, <category>, <author> if you want to include an author besides yourself")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_parts_credit_the_submitter() {
        let strat = parse("https://youtu.be/x, Early Speed, Sector 1, Any%").unwrap();

        assert_eq!(strat.author, None);
        assert_eq!(strat.announcement("samus"), "[Early Speed](https://youtu.be/x), in Sector 1 for Any% by samus");
    }

    #[test]
    fn fifth_part_is_the_author() {
        let strat = parse("https://youtu.be/x, Early Speed, Sector 1, Any%, Alice, Bob").unwrap();

        assert_eq!(strat.author, Some("Alice, Bob"));
        assert_eq!(strat.announcement("samus"), "[Early Speed](https://youtu.be/x), in Sector 1 for Any% by Alice, Bob");
    }

    #[test]
    fn link_is_first_token_of_first_part() {
        let strat = parse("https://youtu.be/x trailing, a, b, c").unwrap();
        assert_eq!(strat.link, "https://youtu.be/x");
    }

    #[test]
    fn commas_without_spaces_are_one_part() {
        assert_eq!(parse("a,b,c,d"), Err(StratError::WrongPartCount(1)));
    }

    #[test]
    fn too_few_parts_are_rejected() {
        assert_eq!(parse("a, b, c"), Err(StratError::WrongPartCount(3)));
        assert_eq!(parse(""), Err(StratError::WrongPartCount(1)));
    }

    #[test]
    fn blank_link_is_rejected() {
        assert_eq!(parse(" , b, c, d"), Err(StratError::MissingLink));
    }

    #[test]
    fn usage_mentions_the_bot() {
        assert_eq!(
            usage(1172249637499981914),
            "Proper usage: <@1172249637499981914> add <link>, <strat name>, <location>, <category>, <author> if you want to include an author besides yourself"
        );
    }
}
