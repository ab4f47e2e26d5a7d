use crate::archive::{BattleArchive, QuestProgress, ResultNotifier};
use crate::config::BattleConfig;
use crate::encounter::MonsterStore;
use crate::roster::{CharacterStore, OpponentPool};
use std::sync::Arc;

/// The collaborators and tunables both battle coordinators run against.
/// Everything behind a trait here lives outside this subsystem: stores are
/// read-only lookups, sinks are write-only.
pub struct BattleDeps {
    pub characters: Arc<dyn CharacterStore>,
    pub opponents: Arc<dyn OpponentPool>,
    pub monsters: Arc<dyn MonsterStore>,
    pub archive: Arc<dyn BattleArchive>,
    pub notifier: Arc<dyn ResultNotifier>,
    pub quests: Arc<dyn QuestProgress>,
    pub config: BattleConfig,
}
