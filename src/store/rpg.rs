//! The progression engine: quests, skills, character leveling, awards.

use rusqlite::{OptionalExtension, params};

use crate::error::{Error, Result};
use crate::model::rpg::{
    Award, AwardOutcome, Character, Quest, QuestOutcome, Skill, SkillOutcome,
};

use super::Store;

impl Store {
    /// Quests still in the open pool.
    pub fn list_quests(&self) -> Result<Vec<Quest>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, xp, willingness, time, trained_skill \
             FROM quests WHERE closed = 0 ORDER BY id ASC",
        )?;
        let quests = stmt
            .query_map([], |row| {
                Ok(Quest {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    xp: row.get(2)?,
                    willingness: row.get(3)?,
                    time_cost: row.get(4)?,
                    trained_skill: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(quests)
    }

    pub fn add_quest(
        &self,
        name: &str,
        xp: i64,
        willingness: i64,
        time_cost: i64,
        trained_skill: Option<i64>,
    ) -> Result<i64> {
        if let Some(skill) = trained_skill {
            self.ensure_skill(skill)?;
        }
        self.conn.execute(
            "INSERT INTO quests(name, xp, willingness, time, trained_skill) \
             VALUES (?, ?, ?, ?, ?)",
            params![name, xp, willingness, time_cost, trained_skill],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Consume a quest: apply xp/gold to the character, train the linked
    /// skill, and remove the quest from the open pool. A quest can only be
    /// consumed once; a second attempt is `NotFound`.
    pub fn close_quest(&self, id: i64) -> Result<QuestOutcome> {
        let quest = self
            .conn
            .query_row(
                "SELECT name, xp, willingness, time, trained_skill \
                 FROM quests WHERE id = ? AND closed = 0",
                [id],
                |row| {
                    Ok(Quest {
                        id,
                        name: row.get(0)?,
                        xp: row.get(1)?,
                        willingness: row.get(2)?,
                        time_cost: row.get(3)?,
                        trained_skill: row.get(4)?,
                    })
                },
            )
            .optional()?
            .ok_or(Error::NotFound {
                entity: "quest",
                id,
            })?;

        let character = self.character()?;
        let xp_after = character.xp + quest.xp;
        let leveled_up = xp_after > character.xp_for_next_level;
        if leveled_up {
            let new_level = character.level + 1;
            // Threshold grows with the level just reached.
            let next = character.xp_for_next_level + 50 + new_level * 5;
            self.conn.execute(
                "UPDATE character SET level = ?, xp_for_next_level = ? WHERE id = 1",
                params![new_level, next],
            )?;
        }

        let mut gold = ((10 - quest.willingness) / 2) * quest.time_cost;
        if leveled_up {
            gold += 100;
        }
        self.conn.execute(
            "UPDATE character SET xp = xp + ?, gold = gold + ? WHERE id = 1",
            params![quest.xp, gold],
        )?;

        let skill = match quest.trained_skill {
            Some(skill_id) => Some(self.train_skill(skill_id, quest.xp)?),
            None => None,
        };

        self.conn
            .execute("UPDATE quests SET closed = 1 WHERE id = ?", [id])?;

        Ok(QuestOutcome {
            quest_name: quest.name,
            leveled_up,
            skill,
        })
    }

    /// A user-typed skill id is checked up front so a bad reference comes
    /// back as not-found rather than a FOREIGN KEY failure.
    fn ensure_skill(&self, id: i64) -> Result<()> {
        self.conn
            .query_row("SELECT 1 FROM skills WHERE id = ?", [id], |_| Ok(()))
            .optional()?
            .ok_or(Error::NotFound {
                entity: "skill",
                id,
            })
    }

    fn train_skill(&self, id: i64, xp: i64) -> Result<SkillOutcome> {
        let (name, level, skill_xp): (String, i64, i64) = self
            .conn
            .query_row(
                "SELECT name, value, xp FROM skills WHERE id = ?",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?
            .ok_or(Error::NotFound {
                entity: "skill",
                id,
            })?;

        let total = skill_xp + xp;
        let increased = total > Skill::LEVEL_XP;
        if increased {
            self.conn.execute(
                "UPDATE skills SET value = value + 1, xp = ? WHERE id = ?",
                params![total - Skill::LEVEL_XP, id],
            )?;
        } else {
            self.conn
                .execute("UPDATE skills SET xp = ? WHERE id = ?", params![total, id])?;
        }
        Ok(SkillOutcome {
            name,
            increased,
            level: if increased { level + 1 } else { level },
        })
    }

    pub fn add_skill(&self, name: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO skills(name) VALUES (?)", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_skills(&self) -> Result<Vec<Skill>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, value, xp FROM skills ORDER BY id ASC")?;
        let skills = stmt
            .query_map([], |row| {
                Ok(Skill {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    level: row.get(2)?,
                    xp: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(skills)
    }

    pub fn list_awards(&self) -> Result<Vec<Award>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, price FROM awards ORDER BY id ASC")?;
        let awards = stmt
            .query_map([], |row| {
                Ok(Award {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    price: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(awards)
    }

    pub fn add_award(&self, name: &str, price: i64) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO awards(name, price) VALUES (?, ?)",
            params![name, price],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Debits the price unconditionally; there is no affordability check
    /// and the balance may go negative.
    pub fn claim_award(&self, id: i64) -> Result<AwardOutcome> {
        let (name, price): (String, i64) = self
            .conn
            .query_row("SELECT name, price FROM awards WHERE id = ?", [id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()?
            .ok_or(Error::NotFound {
                entity: "award",
                id,
            })?;

        self.conn.execute(
            "UPDATE character SET gold = gold - ? WHERE id = 1",
            [price],
        )?;
        Ok(AwardOutcome {
            award_name: name,
            price,
            gold_remaining: self.character()?.gold,
        })
    }

    /// The singleton character row.
    pub fn character(&self) -> Result<Character> {
        let character = self.conn.query_row(
            "SELECT level, gold, xp, xp_for_next_level FROM character WHERE id = 1",
            [],
            |row| {
                Ok(Character {
                    level: row.get(0)?,
                    gold: row.get(1)?,
                    xp: row.get(2)?,
                    xp_for_next_level: row.get(3)?,
                })
            },
        )?;
        Ok(character)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn store() -> Store {
        Store::open_in_memory().unwrap()
    }

    #[test]
    fn character_starts_at_the_seeded_baseline() {
        let character = store().character().unwrap();
        assert_eq!(
            character,
            Character {
                level: 0,
                gold: 0,
                xp: 0,
                xp_for_next_level: 50,
            }
        );
    }

    #[test]
    fn closing_a_quest_levels_up_past_the_threshold() {
        let store = store();
        // Character at 45 xp, threshold 50; a 60-xp quest must level up and
        // raise the threshold to 50 + 50 + 1*5 = 105.
        store
            .conn
            .execute("UPDATE character SET xp = 45 WHERE id = 1", [])
            .unwrap();
        let quest = store.add_quest("big one", 60, 4, 3, None).unwrap();

        let outcome = store.close_quest(quest).unwrap();
        assert!(outcome.leveled_up);
        assert_eq!(outcome.quest_name, "big one");

        let character = store.character().unwrap();
        assert_eq!(character.level, 1);
        assert_eq!(character.xp, 105);
        assert_eq!(character.xp_for_next_level, 105);
        // Base gold ((10-4)/2)*3 plus the level-up bonus.
        assert_eq!(character.gold, 9 + 100);
    }

    #[test]
    fn closing_below_the_threshold_only_accumulates() {
        let store = store();
        let quest = store.add_quest("small", 10, 8, 2, None).unwrap();

        let outcome = store.close_quest(quest).unwrap();
        assert!(!outcome.leveled_up);
        assert!(outcome.skill.is_none());

        let character = store.character().unwrap();
        assert_eq!(character.level, 0);
        assert_eq!(character.xp, 10);
        assert_eq!(character.gold, 2);
    }

    #[test]
    fn skill_xp_rolls_over_at_fifty() {
        let store = store();
        let skill = store.add_skill("writing").unwrap();
        store
            .conn
            .execute("UPDATE skills SET xp = 45 WHERE id = ?", [skill])
            .unwrap();
        let quest = store.add_quest("practice", 10, 5, 1, Some(skill)).unwrap();

        let outcome = store.close_quest(quest).unwrap();
        let trained = outcome.skill.unwrap();
        assert!(trained.increased);
        assert_eq!(trained.level, 1);

        let skills = store.list_skills().unwrap();
        assert_eq!(skills[0].level, 1);
        assert_eq!(skills[0].xp, 5);
    }

    #[test]
    fn a_quest_is_consumed_exactly_once() {
        let store = store();
        let quest = store.add_quest("once", 5, 5, 1, None).unwrap();
        store.close_quest(quest).unwrap();

        assert!(store.list_quests().unwrap().is_empty());
        assert!(matches!(
            store.close_quest(quest),
            Err(Error::NotFound { entity: "quest", .. })
        ));
    }

    #[test]
    fn quest_with_a_missing_skill_is_not_found() {
        let store = store();
        let err = store.add_quest("learn", 5, 5, 1, Some(42)).unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                entity: "skill",
                id: 42
            }
        ));
        assert!(err.is_recoverable());
        assert!(store.list_quests().unwrap().is_empty());
    }

    #[test]
    fn awards_debit_gold_unconditionally() {
        let store = store();
        let award = store.add_award("ice cream", 30).unwrap();

        let outcome = store.claim_award(award).unwrap();
        assert_eq!(outcome.award_name, "ice cream");
        assert_eq!(outcome.price, 30);
        // No affordability check: the balance goes negative.
        assert_eq!(outcome.gold_remaining, -30);
        assert_eq!(store.character().unwrap().gold, -30);
    }

    #[test]
    fn claiming_a_missing_award_is_not_found() {
        assert!(matches!(
            store().claim_award(7),
            Err(Error::NotFound { entity: "award", .. })
        ));
    }
}
