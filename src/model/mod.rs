pub mod project;
pub mod rpg;
pub mod task;

pub use project::{Project, ProjectUpdate};
pub use rpg::{Award, AwardOutcome, Character, Quest, QuestOutcome, Skill, SkillOutcome};
pub use task::{NewTask, Task, TaskStatus, TaskUpdate};
