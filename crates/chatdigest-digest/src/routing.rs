use std::collections::BTreeSet;

use chatdigest_persist::MAIN_THREAD_ID;

/// One digest to produce: which threads feed it and where it is posted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestRoute {
    pub threads: Vec<i64>,
    /// `None` posts into the main thread
    pub destination: Option<i64>,
}

/// Decide how a conversation's threads map to delivered digests.
///
/// - A non-empty `selected` set restricts the eligible threads.
/// - Plain groups get one digest of the main thread.
/// - Forums with a summary topic get one merged digest posted there.
/// - Other forums get one digest per thread, posted back into that thread.
pub fn plan_routes(
    is_forum: bool,
    summary_topic_id: i64,
    known_threads: &BTreeSet<i64>,
    selected: &BTreeSet<i64>,
) -> Vec<DigestRoute> {
    let eligible = |thread_id: &i64| selected.is_empty() || selected.contains(thread_id);

    if !is_forum {
        if !eligible(&MAIN_THREAD_ID) {
            return Vec::new();
        }
        return vec![DigestRoute {
            threads: vec![MAIN_THREAD_ID],
            destination: None,
        }];
    }

    let threads: Vec<i64> = known_threads.iter().copied().filter(eligible).collect();
    if threads.is_empty() {
        return Vec::new();
    }

    if summary_topic_id != 0 {
        return vec![DigestRoute {
            threads,
            destination: Some(summary_topic_id),
        }];
    }

    threads
        .into_iter()
        .map(|thread_id| DigestRoute {
            threads: vec![thread_id],
            destination: (thread_id != MAIN_THREAD_ID).then_some(thread_id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[i64]) -> BTreeSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_plain_group_uses_main_thread() {
        let routes = plan_routes(false, 0, &set(&[0, 5]), &set(&[]));
        assert_eq!(
            routes,
            vec![DigestRoute { threads: vec![0], destination: None }]
        );
    }

    #[test]
    fn test_forum_per_thread() {
        let routes = plan_routes(true, 0, &set(&[0, 3, 8]), &set(&[]));
        assert_eq!(
            routes,
            vec![
                DigestRoute { threads: vec![0], destination: None },
                DigestRoute { threads: vec![3], destination: Some(3) },
                DigestRoute { threads: vec![8], destination: Some(8) },
            ]
        );
    }

    #[test]
    fn test_forum_with_summary_topic_merges() {
        let routes = plan_routes(true, 42, &set(&[0, 3, 8]), &set(&[]));
        assert_eq!(
            routes,
            vec![DigestRoute { threads: vec![0, 3, 8], destination: Some(42) }]
        );
    }

    #[test]
    fn test_selected_topics_filter() {
        let routes = plan_routes(true, 42, &set(&[0, 3, 8]), &set(&[8, 99]));
        assert_eq!(
            routes,
            vec![DigestRoute { threads: vec![8], destination: Some(42) }]
        );

        assert!(plan_routes(false, 0, &set(&[0]), &set(&[3])).is_empty());
    }
}
