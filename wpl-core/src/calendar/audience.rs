//! Who sees a date's plan, and how the audience is described to them.

use std::fmt;

use crate::calendar::entry::CalendarEntry;
use crate::viewer::{Role, Viewer};

/// Coaches see every non-empty entry. Athletes see entries meant for the
/// whole team, entries with no targeting at all, and entries naming them.
pub fn is_visible(entry: &CalendarEntry, viewer: &Viewer) -> bool {
    if entry.is_empty() {
        return false;
    }

    match viewer.role {
        Role::Coach => true,
        Role::Athlete => {
            entry.audience.all || entry.audience.athletes.is_empty() || entry.audience.includes(&viewer.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudienceLabel {
    EntireTeam,
    /// Only ever produced for coaches.
    Athletes(Vec<String>),
    You,
    NotAssigned,
}

impl fmt::Display for AudienceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudienceLabel::EntireTeam => write!(f, "Entire team"),
            AudienceLabel::Athletes(names) => write!(f, "{}", names.join(", ")),
            AudienceLabel::You => write!(f, "You"),
            AudienceLabel::NotAssigned => write!(f, "Not assigned"),
        }
    }
}

pub fn audience_label(entry: &CalendarEntry, viewer: &Viewer) -> AudienceLabel {
    match viewer.role {
        Role::Coach if entry.audience.all || entry.audience.athletes.is_empty() => {
            AudienceLabel::EntireTeam
        }
        Role::Coach => AudienceLabel::Athletes(entry.audience.athletes.clone()),
        Role::Athlete if is_visible(entry, viewer) => AudienceLabel::You,
        Role::Athlete => AudienceLabel::NotAssigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::entry::Audience;

    fn entry(audience: Audience) -> CalendarEntry {
        CalendarEntry::new(vec!["Practice".into()], audience)
    }

    #[test]
    fn test_athlete_matches_case_insensitively() {
        let sam = Viewer::athlete("Sam");
        assert!(is_visible(&entry(Audience::athletes(["sam"])), &sam));
        assert!(!is_visible(&entry(Audience::athletes(["Alex"])), &sam));
    }

    #[test]
    fn test_coach_sees_every_non_empty_entry() {
        let coach = Viewer::coach("Pat");
        assert!(is_visible(&entry(Audience::athletes(["Alex"])), &coach));
        assert!(!is_visible(&CalendarEntry::default(), &coach));
    }

    #[test]
    fn test_unset_audience_is_visible_to_athletes() {
        assert!(is_visible(&entry(Audience::default()), &Viewer::athlete("Sam")));
        assert!(is_visible(&entry(Audience::everyone()), &Viewer::athlete("Sam")));
    }

    #[test]
    fn test_empty_entry_is_hidden_from_everyone() {
        let empty = CalendarEntry {
            items: vec![],
            audience: Audience::everyone(),
        };
        assert!(!is_visible(&empty, &Viewer::athlete("Sam")));
    }

    #[test]
    fn test_coach_labels() {
        let coach = Viewer::coach("Pat");
        assert_eq!(audience_label(&entry(Audience::everyone()), &coach), AudienceLabel::EntireTeam);
        assert_eq!(audience_label(&entry(Audience::default()), &coach), AudienceLabel::EntireTeam);

        let label = audience_label(&entry(Audience::athletes(["Sam", "Alex"])), &coach);
        assert_eq!(label.to_string(), "Sam, Alex");
    }

    #[test]
    fn test_athlete_labels_never_name_teammates() {
        let targeted = entry(Audience::athletes(["Sam", "Alex"]));

        assert_eq!(audience_label(&targeted, &Viewer::athlete("sam")), AudienceLabel::You);

        let label = audience_label(&targeted, &Viewer::athlete("Jo"));
        assert_eq!(label, AudienceLabel::NotAssigned);
        assert!(!label.to_string().contains("Sam"));
    }
}
