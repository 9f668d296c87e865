//! Temporal reconstruction of ref state from the push-event log.
//!
//! Hosting providers keep an event log of ref creation, update and
//! deletion. Replaying it backward from the current tag set recovers
//! which tags existed at an earlier date - the state a submission was
//! actually graded against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commit::{CommitId, Tag};

/// What a ref-lifecycle event did to its ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventAction {
    /// A ref was created.
    PushedNew,
    /// An existing ref was moved.
    PushedTo,
    /// A ref was deleted.
    Deleted,
}

/// The kind of ref an event acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    Branch,
    Tag,
    Commit,
    /// Ref kinds this engine doesn't track.
    #[serde(other)]
    Other,
}

/// A single entry in the ref-lifecycle event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// When the event happened.
    pub date: DateTime<Utc>,

    /// What happened to the ref.
    pub action: EventAction,

    /// What kind of ref it was.
    pub ref_type: RefType,

    /// The ref's name.
    pub ref_name: String,

    /// The commit the ref pointed to (after a push, before a deletion).
    pub commit_id: CommitId,
}

impl Event {
    /// Whether this event changed a tag after the given date.
    fn touches_tag_after(&self, date: DateTime<Utc>) -> bool {
        self.date > date && self.ref_type == RefType::Tag
    }
}

/// Reconstruct which tags existed at `date` from the current tags and the
/// event log.
///
/// Replay is two-phase so the result cannot depend on the order a same-ref
/// push and delete appear in the log: deletions are applied first (a tag
/// deleted after `date` still existed then), pushes second (a tag pushed
/// after `date` did not yet exist then under that name and commit). Each
/// push removes only the first matching entry, so a delete-then-repush
/// pair leaves the copy of the tag that genuinely existed at `date` in
/// place.
#[must_use]
pub fn tags_at_date(date: DateTime<Utc>, tags: &[Tag], events: &[Event]) -> Vec<Tag> {
    let mut tags = tags.to_vec();

    // Add tags that have been deleted since `date`.
    for event in events {
        if event.touches_tag_after(date) && event.action == EventAction::Deleted {
            tags.push(Tag::new(&event.ref_name, &event.commit_id));
        }
    }

    // Remove tags that have been pushed since `date`.
    for event in events {
        if !event.touches_tag_after(date) || event.action == EventAction::Deleted {
            continue;
        }
        if let Some(position) = tags
            .iter()
            .position(|tag| tag.name == event.ref_name && tag.commit_id == event.commit_id)
        {
            tags.remove(position);
        }
    }

    tags
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, day, hour, minute, 0).unwrap()
    }

    fn event(d: DateTime<Utc>, action: EventAction, ref_type: RefType, name: &str, commit: &str) -> Event {
        Event {
            date: d,
            action,
            ref_type,
            ref_name: name.into(),
            commit_id: commit.into(),
        }
    }

    #[test]
    fn test_tag_added_after_deadline_is_removed() {
        let tags = vec![
            Tag::new("master", "111"),
            Tag::new("develop", "222"),
            Tag::new("feature", "333"),
        ];
        let events = vec![event(
            date(2, 0, 0),
            EventAction::PushedNew,
            RefType::Tag,
            "feature",
            "333",
        )];

        let at_deadline = tags_at_date(date(1, 0, 0), &tags, &events);
        assert_eq!(at_deadline.len(), 2);
        assert_eq!(at_deadline[0].name, "master");
        assert_eq!(at_deadline[1].name, "develop");
    }

    #[test]
    fn test_tag_deleted_after_deadline_is_restored() {
        let tags = vec![Tag::new("master", "111"), Tag::new("develop", "222")];
        let events = vec![event(
            date(2, 0, 0),
            EventAction::Deleted,
            RefType::Tag,
            "feature",
            "333",
        )];

        let at_deadline = tags_at_date(date(1, 0, 0), &tags, &events);
        assert_eq!(at_deadline.len(), 3);
        assert_eq!(at_deadline[2], Tag::new("feature", "333"));
    }

    #[test]
    fn test_tag_added_and_deleted_after_deadline_stays_absent() {
        let tags = vec![Tag::new("master", "111"), Tag::new("develop", "222")];

        // Events come from the provider most recent first.
        let events = vec![
            event(date(2, 0, 1), EventAction::Deleted, RefType::Tag, "feature", "333"),
            event(date(2, 0, 0), EventAction::PushedNew, RefType::Tag, "feature", "333"),
        ];

        let at_deadline = tags_at_date(date(1, 0, 0), &tags, &events);
        assert_eq!(at_deadline.len(), 2);
        assert_eq!(at_deadline[0].name, "master");
        assert_eq!(at_deadline[1].name, "develop");
    }

    #[test]
    fn test_replay_is_order_independent() {
        // Same pair of events in the opposite log order must give the
        // same answer.
        let tags = vec![Tag::new("master", "111")];
        let events = vec![
            event(date(2, 0, 0), EventAction::PushedNew, RefType::Tag, "feature", "333"),
            event(date(2, 0, 1), EventAction::Deleted, RefType::Tag, "feature", "333"),
        ];

        let at_deadline = tags_at_date(date(1, 0, 0), &tags, &events);
        assert_eq!(at_deadline.len(), 1);
        assert_eq!(at_deadline[0].name, "master");
    }

    #[test]
    fn test_deleted_then_repushed_tag_existed_at_deadline() {
        // The tag existed at the deadline, was deleted, then pushed again:
        // the current entry must survive the replay.
        let tags = vec![Tag::new("release", "444")];
        let events = vec![
            event(date(3, 0, 0), EventAction::PushedNew, RefType::Tag, "release", "444"),
            event(date(2, 0, 0), EventAction::Deleted, RefType::Tag, "release", "444"),
        ];

        let at_deadline = tags_at_date(date(1, 0, 0), &tags, &events);
        assert_eq!(at_deadline, vec![Tag::new("release", "444")]);
    }

    #[test]
    fn test_events_at_or_before_deadline_are_ignored() {
        let tags = vec![Tag::new("v1", "111")];
        let events = vec![event(
            date(1, 0, 0),
            EventAction::PushedNew,
            RefType::Tag,
            "v1",
            "111",
        )];

        // Event date equals the query date: not after it, so no replay.
        let at_deadline = tags_at_date(date(1, 0, 0), &tags, &events);
        assert_eq!(at_deadline.len(), 1);
    }

    #[test]
    fn test_branch_events_do_not_touch_tags() {
        let tags = vec![Tag::new("v1", "111")];
        let events = vec![
            event(date(2, 0, 0), EventAction::PushedNew, RefType::Branch, "v1", "111"),
            event(date(2, 0, 1), EventAction::Deleted, RefType::Branch, "old", "999"),
        ];

        let at_deadline = tags_at_date(date(1, 0, 0), &tags, &events);
        assert_eq!(at_deadline, vec![Tag::new("v1", "111")]);
    }

    #[test]
    fn test_moved_tag_restores_old_target() {
        // Tag moved from 111 to 222 after the deadline: the old entry is
        // restored by the deletion, the new one removed by the push.
        let tags = vec![Tag::new("v1", "222")];
        let events = vec![
            event(date(2, 0, 0), EventAction::PushedTo, RefType::Tag, "v1", "222"),
            event(date(2, 0, 0), EventAction::Deleted, RefType::Tag, "v1", "111"),
        ];

        let at_deadline = tags_at_date(date(1, 0, 0), &tags, &events);
        assert_eq!(at_deadline, vec![Tag::new("v1", "111")]);
    }
}
