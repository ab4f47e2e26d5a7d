use std::net::SocketAddr;
use std::time::Duration;

/// Combat and session tunables. The defaults match the design values: damage
/// is floored at 1, defense counts at half weight, criticals multiply by 1.5,
/// and a battle that outlives `max_turns` is forced to a draw instead of
/// looping forever.
#[derive(Debug, Clone)]
pub struct BattleConfig {
    /// Fraction of the defender's defense subtracted from the attack.
    pub defense_factor: f64,
    /// Damage multiplier applied on a critical hit.
    pub critical_multiplier: f64,
    /// Hard cap on turns; reaching it without a knockout is a draw.
    pub max_turns: u32,
    /// Delay between resolved PvE turns so clients can pace narration.
    pub turn_pace: Duration,
    /// Permille chance that an encounter draws from the NORMAL pool; the
    /// remainder draws a BOSS.
    pub normal_rate_permille: u16,
    /// Attempts against the archive sink before giving up on durability.
    pub archive_attempts: u32,
    /// PvP sessions idle longer than this are evicted by the sweep.
    pub idle_timeout: Duration,
    /// How often the sweep task runs.
    pub sweep_interval: Duration,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            defense_factor: 0.5,
            critical_multiplier: 1.5,
            max_turns: 100,
            turn_pace: Duration::from_secs(1),
            normal_rate_permille: 980,
            archive_attempts: 3,
            idle_timeout: Duration::from_secs(600),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// Process-level settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("ARENA_BIND_ADDR")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));
        Self { bind_addr }
    }
}
