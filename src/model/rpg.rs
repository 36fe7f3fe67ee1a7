//! Gamification entities layered atop task completion.

/// A quest: consumed once, granting xp and gold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quest {
    pub id: i64,
    pub name: String,
    pub xp: i64,
    /// Willingness/difficulty rating; lower willingness pays more gold.
    pub willingness: i64,
    /// Time cost factor in the gold formula.
    pub time_cost: i64,
    /// Skill trained when the quest closes.
    pub trained_skill: Option<i64>,
}

/// A trainable skill. Levels up every fixed 50 xp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub level: i64,
    /// Accumulated xp toward the next level-up.
    pub xp: i64,
}

impl Skill {
    /// Per-level rollover threshold.
    pub const LEVEL_XP: i64 = 50;
}

/// The singleton character row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub level: i64,
    pub gold: i64,
    pub xp: i64,
    pub xp_for_next_level: i64,
}

/// Something gold can buy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Award {
    pub id: i64,
    pub name: String,
    pub price: i64,
}

/// Result of consuming a quest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestOutcome {
    pub quest_name: String,
    pub leveled_up: bool,
    /// Present when the quest trains a skill.
    pub skill: Option<SkillOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillOutcome {
    pub name: String,
    pub increased: bool,
    /// Skill level after the update.
    pub level: i64,
}

/// Result of claiming an award. Gold is debited unconditionally; the
/// balance may go negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardOutcome {
    pub award_name: String,
    pub price: i64,
    pub gold_remaining: i64,
}
