//! Keeps a leaderboard current by following a store's change feed.

use anyhow::Result;
use std::future::Future;
use tracing::{debug, warn};

use crate::model::ProjectScore;
use crate::scoring::{compute_personal_project_scores, compute_project_scores};
use crate::store::{ContestData, FeedMessage, ScoreEvent, ScoreFeed, ScoreStore};

/// Local mirror of a contest plus its derived rankings.
///
/// Rankings are recomputed from the whole snapshot after every change that
/// actually modifies it, so they always match what a fresh
/// [`compute_project_scores`] call over the same data would return.
#[derive(Debug, Clone)]
pub struct LiveBoard {
    data: ContestData,
    judge_id: Option<String>,
    rankings: Vec<ProjectScore>,
    personal: Option<Vec<ProjectScore>>,
}

impl LiveBoard {
    /// Build a board over `data`. With a `judge_id`, a judge-scoped ranking is
    /// kept alongside the global one.
    pub fn new(data: ContestData, judge_id: Option<String>) -> Self {
        let mut board = Self {
            data,
            judge_id,
            rankings: Vec::new(),
            personal: None,
        };
        board.recompute();
        board
    }

    /// Subscribe to `store` and load its current snapshot.
    ///
    /// The subscription is taken before the snapshot is read so no change
    /// falls in between. Events already reflected in the snapshot arrive
    /// again and are dropped by the timestamp check.
    pub fn follow(store: &dyn ScoreStore, judge_id: Option<String>) -> Result<(Self, ScoreFeed)> {
        let feed = store
            .subscribe()
            .ok_or_else(|| anyhow::anyhow!("store does not publish score changes"))?;
        let board = Self::new(store.snapshot()?, judge_id);
        Ok((board, feed))
    }

    pub fn data(&self) -> &ContestData {
        &self.data
    }

    pub fn rankings(&self) -> &[ProjectScore] {
        &self.rankings
    }

    pub fn personal_rankings(&self) -> Option<&[ProjectScore]> {
        self.personal.as_deref()
    }

    /// Apply one change. Returns true if the snapshot changed.
    pub fn apply(&mut self, event: &ScoreEvent) -> bool {
        let changed = self.data.apply_event(event);
        if changed {
            let (project_id, judge_id) = event.key();
            debug!(project_id, judge_id, "live board updated");
            self.recompute();
        }
        changed
    }

    /// Replace the local snapshot with the store's current one
    pub fn reload(&mut self, store: &dyn ScoreStore) -> Result<()> {
        self.data = store.snapshot()?;
        self.recompute();
        Ok(())
    }

    /// Follow `feed` until `shutdown` resolves or the feed closes, calling
    /// `on_update` after every change to the rankings.
    ///
    /// Pending events are drained before `shutdown` is checked. When the feed
    /// reports lost events the whole snapshot is reloaded from `store`.
    pub async fn run<S, F>(
        &mut self,
        store: &dyn ScoreStore,
        mut feed: ScoreFeed,
        shutdown: S,
        mut on_update: F,
    ) -> Result<()>
    where
        S: Future<Output = ()>,
        F: FnMut(&LiveBoard),
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                message = feed.next() => match message {
                    FeedMessage::Event(event) => {
                        if self.apply(&event) {
                            on_update(self);
                        }
                    }
                    FeedMessage::Lagged(skipped) => {
                        warn!(skipped, "score feed lagged, reloading snapshot");
                        self.reload(store)?;
                        on_update(self);
                    }
                    FeedMessage::Closed => {
                        debug!("score feed closed");
                        return Ok(());
                    }
                },
                _ = &mut shutdown => return Ok(()),
            }
        }
    }

    fn recompute(&mut self) {
        self.rankings = compute_project_scores(&self.data.projects, &self.data.scores);
        self.personal = self.judge_id.as_deref().map(|judge_id| {
            compute_personal_project_scores(&self.data.projects, &self.data.scores, judge_id)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::starter_data;
    use crate::model::Score;
    use crate::store::{ChangeFeed, MemoryStore};
    use chrono::Duration;

    fn leader(board: &LiveBoard) -> &str {
        &board.rankings()[0].project_id
    }

    #[test]
    fn test_apply_updates_rankings() {
        let mut board = LiveBoard::new(starter_data(), Some("j2".to_string()));
        assert_eq!(leader(&board), "p1");
        assert_eq!(board.rankings()[0].total_average, 0.0);

        let score = Score::new("p4", "j1", [9.0; 4]);
        assert!(board.apply(&ScoreEvent::Inserted { score }));
        assert_eq!(leader(&board), "p4");
        assert_eq!(board.rankings()[0].total_average, 9.0);

        // j2 has scored nothing, so the personal view stays in input order
        let personal = board.personal_rankings().unwrap();
        assert_eq!(personal[0].project_id, "p1");
        assert_eq!(personal[0].total_average, 0.0);
    }

    #[test]
    fn test_stale_event_is_ignored() {
        let mut board = LiveBoard::new(starter_data(), None);
        let fresh = Score::new("p2", "j1", [8.0; 4]);
        let mut stale = Score::new("p2", "j1", [2.0; 4]);
        stale.last_updated = fresh.last_updated - Duration::seconds(30);

        assert!(board.apply(&ScoreEvent::Updated { score: fresh }));
        assert!(!board.apply(&ScoreEvent::Updated { score: stale }));
        assert_eq!(board.rankings()[0].project_id, "p2");
        assert_eq!(board.rankings()[0].total_average, 8.0);
    }

    #[test]
    fn test_delete_event_removes_contribution() {
        let mut board = LiveBoard::new(starter_data(), None);
        let score = Score::new("p5", "j3", [7.0; 4]);
        let deleted_at = score.last_updated + Duration::seconds(1);
        board.apply(&ScoreEvent::Inserted { score });
        assert_eq!(leader(&board), "p5");

        assert!(board.apply(&ScoreEvent::Deleted {
            project_id: "p5".to_string(),
            judge_id: "j3".to_string(),
            deleted_at,
        }));
        assert_eq!(leader(&board), "p1");
        assert!(board.rankings().iter().all(|ps| ps.total_average == 0.0));
    }

    #[test]
    fn test_redelivered_insert_does_not_restore_deleted_score() {
        let store = MemoryStore::new(starter_data());
        let (mut board, mut feed) = LiveBoard::follow(&store, None).unwrap();

        store.upsert_score(Score::new("p3", "j1", [9.0; 4])).unwrap();
        store.delete_score("p3", "j1").unwrap();

        let mut events = Vec::new();
        while let Some(FeedMessage::Event(event)) = feed.try_next() {
            events.push(event);
        }
        assert_eq!(events.len(), 2);

        assert!(board.apply(&events[0]));
        assert!(board.apply(&events[1]));
        // the insert arrives a second time
        assert!(!board.apply(&events[0]));

        let fresh = compute_project_scores(
            &store.list_projects().unwrap(),
            &store.list_scores().unwrap(),
        );
        assert_eq!(board.rankings(), fresh.as_slice());
        assert_eq!(board.rankings()[0].total_average, 0.0);
    }

    #[test]
    fn test_follow_requires_feed() {
        struct NoFeed;
        impl ScoreStore for NoFeed {
            fn list_projects(&self) -> Result<Vec<crate::model::Project>> {
                Ok(Vec::new())
            }
            fn list_judges(&self) -> Result<Vec<crate::model::Judge>> {
                Ok(Vec::new())
            }
            fn list_scores(&self) -> Result<Vec<Score>> {
                Ok(Vec::new())
            }
            fn upsert_score(&self, score: Score) -> Result<ScoreEvent> {
                Ok(ScoreEvent::Inserted { score })
            }
        }

        assert!(LiveBoard::follow(&NoFeed, None).is_err());
    }

    #[tokio::test]
    async fn test_run_applies_store_writes() {
        let store = MemoryStore::new(starter_data());
        let (mut board, feed) = LiveBoard::follow(&store, Some("j1".to_string())).unwrap();

        store.upsert_score(Score::new("p3", "j1", [6.0; 4])).unwrap();
        store.upsert_score(Score::new("p3", "j2", [8.0; 4])).unwrap();
        store.upsert_score(Score::new("p2", "j2", [9.0; 4])).unwrap();

        let mut updates = 0;
        board
            .run(&store, feed, std::future::ready(()), |_| updates += 1)
            .await
            .unwrap();

        assert_eq!(updates, 3);
        assert_eq!(leader(&board), "p2");
        let p3 = board
            .rankings()
            .iter()
            .find(|ps| ps.project_id == "p3")
            .unwrap();
        assert_eq!(p3.total_average, 7.0);
        assert_eq!(p3.judge_count, 2);

        let personal = board.personal_rankings().unwrap();
        assert_eq!(personal[0].project_id, "p3");
        assert_eq!(personal[0].total_average, 6.0);
    }

    #[tokio::test]
    async fn test_run_reloads_after_lag() {
        let store = MemoryStore::with_feed(starter_data(), ChangeFeed::new(2));
        let (mut board, feed) = LiveBoard::follow(&store, None).unwrap();

        for (i, project_id) in ["p1", "p2", "p3", "p4", "p5"].iter().enumerate() {
            let rating = (i + 1) as f64;
            store
                .upsert_score(Score::new(project_id, "j1", [rating; 4]))
                .unwrap();
        }

        board
            .run(&store, feed, std::future::ready(()), |_| {})
            .await
            .unwrap();

        assert_eq!(board.data().scores.len(), 5);
        assert_eq!(leader(&board), "p5");
        assert_eq!(board.rankings()[0].total_average, 5.0);
        assert_eq!(board.rankings()[4].project_id, "p1");
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_when_idle() {
        let store = MemoryStore::new(starter_data());
        let (mut board, feed) = LiveBoard::follow(&store, None).unwrap();

        board
            .run(&store, feed, async {}, |_| panic!("no updates expected"))
            .await
            .unwrap();

        assert!(board.data().scores.is_empty());
    }
}
