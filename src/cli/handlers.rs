//! One handler per subcommand. Each opens the store, performs a single
//! operation, and prints a short result.

use std::path::Path;

use chrono::Local;

use crate::cli::commands::{
    AddArgs, CloseArgs, Commands, DeleteArgs, ListArgs, ModArgs, NoteArgs, ReportArgs, RpgArgs,
};
use crate::cli::output;
use crate::config;
use crate::dates;
use crate::error::Result;
use crate::model::task::{NewTask, TaskStatus, TaskUpdate};
use crate::store::tasks::{TaskQuery, WeightScope};
use crate::store::Store;

pub fn dispatch(command: Commands, config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config::default_path);
    let config = config::read_config(&path)?;
    let store = Store::open(&config.db_path)?;

    match command {
        Commands::Add(args) => cmd_add(&store, args),
        Commands::List(args) => cmd_list(&store, args, config.list_limit),
        Commands::Mod(args) => cmd_mod(&store, args),
        Commands::Close(args) => cmd_close(&store, args),
        Commands::Delete(args) => cmd_delete(&store, args),
        Commands::Report(args) => cmd_report(&store, args),
        Commands::Note(args) => cmd_note(&store, args),
        Commands::Rpg(args) => cmd_rpg(&store, args),
    }
}

fn cmd_add(store: &Store, args: AddArgs) -> Result<()> {
    // The token was validated at parse time; resolving here pins the date
    // to the moment the task is actually created.
    let due = dates::resolve(&args.date)?;
    let id = store.add_task(&NewTask {
        name: args.name,
        priority: args.priority,
        weight: args.weight,
        due_time: args.time,
        due: Some(due),
        repeat: args.repeat,
        project: args.project,
    })?;
    println!("created task {id}");
    Ok(())
}

fn cmd_list(store: &Store, args: ListArgs, limit: usize) -> Result<()> {
    let query = if args.top {
        TaskQuery::top()
    } else {
        TaskQuery {
            top_only: false,
            include_closed: args.all,
            due: args.date.as_deref().map(dates::resolve).transpose()?,
            project: args.project,
            include_overdue: args.overdue,
            limit,
        }
    };
    output::print_tasks(&store.list_tasks(&query)?);
    Ok(())
}

fn cmd_mod(store: &Store, args: ModArgs) -> Result<()> {
    let update = TaskUpdate {
        name: args.name,
        priority: args.priority,
        weight: args.weight,
        status: args.status.and_then(TaskStatus::from_int),
        due: args.date.as_deref().map(dates::resolve).transpose()?,
        due_time: args.time,
        repeat: args.repeat,
        project: args.project,
        priority_in_project: args.project_priority,
    };
    store.modify_task(args.id, &update)?;
    println!("modified task {}", args.id);
    Ok(())
}

fn cmd_close(store: &Store, args: CloseArgs) -> Result<()> {
    let id = match args.id {
        Some(id) => id,
        // Interactive mode: offer the current top task.
        None => {
            let top = store.list_tasks(&TaskQuery::top())?;
            let Some(task) = top.first() else {
                println!("no task is due right now");
                return Ok(());
            };
            if !output::ask_confirmation(&format!("close '{}'?", task.name))? {
                return Ok(());
            }
            task.id
        }
    };

    let (name, outcome) = store.close_task(id)?;
    println!("closed '{name}'");
    if let Some(outcome) = &outcome {
        output::print_quest_outcome(outcome);
    }

    if args.id.is_none() {
        match store.list_tasks(&TaskQuery::top())?.first() {
            Some(next) => println!("next up: {}", next.name),
            None => println!("nothing else is due"),
        }
    }
    Ok(())
}

fn cmd_delete(store: &Store, args: DeleteArgs) -> Result<()> {
    store.delete_task(args.id)?;
    println!("deleted task {}", args.id);
    Ok(())
}

fn cmd_report(store: &Store, args: ReportArgs) -> Result<()> {
    let date = match args.date.as_deref() {
        Some(date) => dates::ensure_date(date)?,
        None => Local::now().date_naive(),
    };
    let scope = if args.closed {
        WeightScope::Closed
    } else {
        WeightScope::All
    };
    let total = store.total_weight(scope, date)?;
    let label = match scope {
        WeightScope::All => "total",
        WeightScope::Closed => "closed",
    };
    println!("{label} weight on {date}: {total}");
    Ok(())
}

fn cmd_note(store: &Store, args: NoteArgs) -> Result<()> {
    let date = args
        .date
        .as_deref()
        .map(dates::ensure_date)
        .transpose()?;
    store.add_note(date, &args.text)?;
    println!("noted");
    Ok(())
}

fn cmd_rpg(store: &Store, args: RpgArgs) -> Result<()> {
    if args.list_quests {
        output::print_quests(&store.list_quests()?);
    } else if let Some(id) = args.finish_quest {
        let outcome = store.close_quest(id)?;
        output::print_quest_outcome(&outcome);
        output::print_character(&store.character()?, &store.list_skills()?);
    } else if args.list_awards {
        output::print_awards(&store.list_awards()?);
    } else if let Some(id) = args.claim_award {
        let outcome = store.claim_award(id)?;
        println!(
            "claimed '{}' for {} gold ({} left)",
            outcome.award_name, outcome.price, outcome.gold_remaining
        );
    } else if args.character {
        output::print_character(&store.character()?, &store.list_skills()?);
    } else {
        output::print_character(&store.character()?, &store.list_skills()?);
        println!();
        output::print_quests(&store.list_quests()?);
        println!();
        output::print_awards(&store.list_awards()?);
    }
    Ok(())
}
