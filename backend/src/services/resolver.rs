use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    db::MatchStore,
    error::{MatchError, StoreError},
    models::{CanonicalPair, Match, SwipeAction, SwipeOutcome},
    services::policy::StorePolicy,
};

/// Turns swipe actions into match record mutations.
pub struct MatchResolver {
    store: Arc<dyn MatchStore>,
    policy: StorePolicy,
}

impl MatchResolver {
    pub fn new(store: Arc<dyn MatchStore>, policy: StorePolicy) -> Self {
        Self { store, policy }
    }

    /// Parse a raw action name and resolve it.
    pub async fn resolve_raw(&self, actor: &str, target: &str, action: &str) -> Result<SwipeOutcome, MatchError> {
        let action: SwipeAction = action.parse()?;
        self.resolve_swipe(actor, target, action).await
    }

    pub async fn resolve_swipe(
        &self,
        actor: &str,
        target: &str,
        action: SwipeAction,
    ) -> Result<SwipeOutcome, MatchError> {
        let pair = CanonicalPair::new(actor, target)?;

        info!("Swipe {} -> {} ({})", actor, target, action);

        if !action.is_positive() {
            return Ok(SwipeOutcome::Passed);
        }

        let existing = self.call("find_match", || self.store.find_match(&pair)).await?;
        let record = match existing {
            Some(record) => record,
            None => match self.call("create_match", || self.store.create_match(&pair, actor)).await {
                Ok(created) => {
                    info!("Created one-sided match {} for {} / {}", created.id, created.user_a, created.user_b);
                    return Ok(SwipeOutcome::Created(created));
                }
                Err(StoreError::Conflict) => {
                    warn!(
                        "Concurrent first swipe on {} / {}, re-reading",
                        pair.user_a(),
                        pair.user_b()
                    );
                    self.call("find_match", || self.store.find_match(&pair))
                        .await?
                        .ok_or_else(|| {
                            MatchError::StoreUnavailable(
                                "match missing after uniqueness conflict".to_string(),
                            )
                        })?
                }
                Err(e) => return Err(e.into()),
            },
        };

        self.advance(record, actor).await
    }

    /// Apply a positive swipe from `actor` to an existing record.
    async fn advance(&self, record: Match, actor: &str) -> Result<SwipeOutcome, MatchError> {
        if record.is_mutual || record.initiated_by == actor {
            return Ok(SwipeOutcome::Unchanged(record));
        }

        let updated = self.call("mark_mutual", || self.store.mark_mutual(&record)).await?;
        info!("Match {} is now mutual ({} / {})", updated.id, updated.user_a, updated.user_b);

        Ok(SwipeOutcome::BecameMutual(updated))
    }

    pub async fn matches_for(&self, user_id: &str) -> Result<Vec<Match>, MatchError> {
        if user_id.trim().is_empty() {
            return Err(MatchError::InvalidInput("user id is required".to_string()));
        }
        Ok(self.call("list_matches_for", || self.store.list_matches_for(user_id)).await?)
    }

    async fn call<T, F, Fut>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, StoreError>>,
    {
        self.policy.call(self.store.backend_tag(), op, f).await
    }
}
