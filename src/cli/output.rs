//! Plain-text rendering for the one-shot commands.

use std::io::{self, Write};

use crate::model::rpg::{Award, Character, Quest, QuestOutcome, Skill};
use crate::model::task::Task;

pub fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("no tasks");
        return;
    }
    println!(
        "{:>4}  {:>4}  {:<10}  {:<5}  {:>6}  name",
        "id", "pri", "due", "time", "weight"
    );
    for task in tasks {
        let marker = if task.status.is_open() { ' ' } else { 'x' };
        println!(
            "{:>4}  {:>4}  {:<10}  {:<5}  {:>6} {marker}{}",
            task.id,
            task.priority,
            task.due_date.as_deref().unwrap_or("-"),
            task.due_time.as_deref().unwrap_or("-"),
            task.weight,
            task.name,
        );
    }
}

pub fn print_quests(quests: &[Quest]) {
    if quests.is_empty() {
        println!("no open quests");
        return;
    }
    println!(
        "{:>4}  {:>4}  {:>4}  {:>4}  name",
        "id", "xp", "will", "time"
    );
    for quest in quests {
        println!(
            "{:>4}  {:>4}  {:>4}  {:>4}  {}",
            quest.id, quest.xp, quest.willingness, quest.time_cost, quest.name
        );
    }
}

pub fn print_awards(awards: &[Award]) {
    if awards.is_empty() {
        println!("no awards");
        return;
    }
    println!("{:>4}  {:>5}  name", "id", "price");
    for award in awards {
        println!("{:>4}  {:>5}  {}", award.id, award.price, award.name);
    }
}

pub fn print_character(character: &Character, skills: &[Skill]) {
    println!(
        "level {}  xp {}/{}  gold {}",
        character.level, character.xp, character.xp_for_next_level, character.gold
    );
    for skill in skills {
        println!("  {} {} ({} xp)", skill.name, skill.level, skill.xp);
    }
}

pub fn print_quest_outcome(outcome: &QuestOutcome) {
    println!("quest complete: {}", outcome.quest_name);
    if outcome.leveled_up {
        println!("level up!");
    }
    if let Some(skill) = &outcome.skill {
        if skill.increased {
            println!("{} is now level {}", skill.name, skill.level);
        }
    }
}

/// Yes/no prompt on stdout; anything but `y` declines.
pub fn ask_confirmation(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}
