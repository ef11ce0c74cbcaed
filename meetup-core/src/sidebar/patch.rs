use tracing::debug;

use crate::error::{MeetupError, MeetupResult};

/// Written between the table and the preserved part of the page.
pub const TRAILING_SEPARATOR: &str = "&nbsp; \n";

/// Result of splicing a fragment into the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarPatch {
    pub text: String,
    /// False when publishing `text` would not change the stored page.
    pub changed: bool,
}

/// Replace everything before the first `anchor` with `header + fragment`.
///
/// The wiki re-escapes the separator's `&nbsp;` as `&amp;nbsp;` on some reads,
/// so a page differing only by that escape right before the anchor counts as
/// unchanged.
pub fn patch(current: &str, fragment: &str, anchor: &str, header: &str) -> MeetupResult<SidebarPatch> {
    let anchor_index = current
        .find(anchor)
        .ok_or_else(|| MeetupError::AnchorNotFound(anchor.to_string()))?;

    let mut text =
        String::with_capacity(header.len() + fragment.len() + current.len() - anchor_index + 8);
    text.push_str(header);
    text.push_str(fragment);
    text.push_str(TRAILING_SEPARATOR);
    text.push_str(&current[anchor_index..]);

    let changed = text != current && text != unescape_separator(current, anchor);
    debug!(changed, bytes = text.len(), "sidebar patch computed");

    Ok(SidebarPatch { text, changed })
}

fn unescape_separator(page: &str, anchor: &str) -> String {
    page.replace(
        &format!("&amp;nbsp; \n{anchor}"),
        &format!("{TRAILING_SEPARATOR}{anchor}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sidebar::{DEFAULT_ANCHOR, DEFAULT_HEADER};

    const FRAGMENT: &str = "Date|Event\n:-:|:-:\n10 Mar|[Happy Hour @ Bar](http://x/1)\n";
    const PRESERVED: &str = "#Weekly Happy Hour\nEvery Thursday.\n\n#Rules\nBe nice.";

    fn run(current: &str) -> MeetupResult<SidebarPatch> {
        patch(current, FRAGMENT, DEFAULT_ANCHOR, DEFAULT_HEADER)
    }

    #[test]
    fn replaces_prefix_and_preserves_suffix() {
        let current = format!("old table\n{PRESERVED}");
        let result = run(&current).unwrap();

        assert!(result.changed);
        assert_eq!(
            result.text,
            format!("###Upcoming Meetups  \n\n{FRAGMENT}&nbsp; \n{PRESERVED}")
        );
    }

    #[test]
    fn second_patch_is_unchanged() {
        let first = run(&format!("stale\n{PRESERVED}")).unwrap();
        let second = run(&first.text).unwrap();

        assert!(!second.changed);
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn escaped_separator_counts_as_equal() {
        let stored = format!("###Upcoming Meetups  \n\n{FRAGMENT}&amp;nbsp; \n{PRESERVED}");
        let result = run(&stored).unwrap();

        assert!(!result.changed);
        assert_ne!(result.text, stored);
    }

    #[test]
    fn escaped_separator_with_new_rows_is_changed() {
        let stored = "###Upcoming Meetups  \n\nDate|Event\n:-:|:-:\n&amp;nbsp; \n#Weekly Happy Hour\n";
        assert!(run(stored).unwrap().changed);
    }

    #[test]
    fn uses_first_anchor() {
        let current = format!("x\n{PRESERVED}\n#Weekly Happy Hour again");
        let result = run(&current).unwrap();
        assert!(result.text.ends_with("Be nice.\n#Weekly Happy Hour again"));
        assert_eq!(result.text.matches(DEFAULT_ANCHOR).count(), 2);
    }

    #[test]
    fn missing_anchor_fails() {
        assert!(matches!(
            run("no marker here"),
            Err(MeetupError::AnchorNotFound(a)) if a == DEFAULT_ANCHOR
        ));
    }
}
