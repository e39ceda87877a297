use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use coddy_core::roadmap::{self, RoadmapDocument};
use std::path::Path;

#[derive(Subcommand)]
pub enum RoadmapSubcommand {
    /// List phases and tasks with their indices
    Show,
    /// Flip a task between done and not done (zero-based indices)
    Toggle { phase: usize, task: usize },
    /// Mark the first task with exactly this text as done
    Complete {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show the first unfinished task
    Next,
    /// Per-phase completion counts
    Progress,
    /// Print the normalized roadmap markdown without saving it
    Render,
}

pub fn run(root: &Path, subcmd: RoadmapSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        RoadmapSubcommand::Show => show(root, json),
        RoadmapSubcommand::Toggle { phase, task } => toggle(root, phase, task, json),
        RoadmapSubcommand::Complete { text } => complete(root, &text.join(" "), json),
        RoadmapSubcommand::Next => next(root, json),
        RoadmapSubcommand::Progress => progress(root, json),
        RoadmapSubcommand::Render => render(root),
    }
}

fn load(root: &Path) -> anyhow::Result<RoadmapDocument> {
    roadmap::load_roadmap(root).context("failed to load roadmap.md")
}

fn save(root: &Path, doc: &RoadmapDocument) -> anyhow::Result<()> {
    roadmap::save_roadmap(root, doc).context("failed to save roadmap.md")
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let doc = load(root)?;

    if json {
        print_json(&doc)?;
        return Ok(());
    }

    if doc.phases.is_empty() {
        println!("No phases in roadmap.md.");
        return Ok(());
    }

    for (p, phase) in doc.phases.iter().enumerate() {
        if p > 0 {
            println!();
        }
        println!("{}  ({})", phase.title, phase.progress());
        for (t, task) in phase.tasks.iter().enumerate() {
            let mark = if task.completed { "x" } else { " " };
            println!("  [{mark}] {p}.{t}  {}", task.text);
        }
    }
    Ok(())
}

fn toggle(root: &Path, phase: usize, task: usize, json: bool) -> anyhow::Result<()> {
    let mut doc = load(root)?;
    doc.toggle_task(phase, task)
        .context("run 'coddy roadmap show' to list valid indices")?;
    save(root, &doc)?;

    let toggled = doc
        .task(phase, task)
        .with_context(|| format!("task {phase}.{task} is missing after toggling"))?;

    if json {
        print_json(&serde_json::json!({
            "phase": phase,
            "task": task,
            "text": toggled.text,
            "completed": toggled.completed,
        }))?;
    } else {
        let state = if toggled.completed { "done" } else { "not done" };
        println!("Marked {phase}.{task} {state}: {}", toggled.text);
    }
    Ok(())
}

fn complete(root: &Path, text: &str, json: bool) -> anyhow::Result<()> {
    let mut doc = load(root)?;
    let found = doc.complete_task_by_text(text);
    if found {
        save(root, &doc)?;
    }

    if json {
        print_json(&serde_json::json!({ "text": text.trim(), "completed": found }))?;
    } else if found {
        println!("Completed: {}", text.trim());
    } else {
        println!("No task matching '{}'.", text.trim());
    }
    Ok(())
}

fn next(root: &Path, json: bool) -> anyhow::Result<()> {
    let doc = load(root)?;
    let next = doc.next_task();

    if json {
        let value = match next {
            Some((p, t, task)) => serde_json::json!({
                "phase": p,
                "task": t,
                "phase_title": doc.phases[p].title,
                "text": task.text,
            }),
            None => serde_json::Value::Null,
        };
        print_json(&value)?;
        return Ok(());
    }

    match next {
        Some((p, t, task)) => {
            println!("{}", doc.phases[p].title);
            println!("  [ ] {p}.{t}  {}", task.text);
        }
        None => println!("All tasks complete."),
    }
    Ok(())
}

fn progress(root: &Path, json: bool) -> anyhow::Result<()> {
    let doc = load(root)?;

    if json {
        let phases: Vec<serde_json::Value> = doc
            .phases
            .iter()
            .map(|phase| {
                let progress = phase.progress();
                serde_json::json!({
                    "title": phase.title,
                    "completed": progress.completed,
                    "total": progress.total,
                    "percent": progress.percent(),
                    "done": progress.is_done(),
                })
            })
            .collect();
        let overall = doc.progress();
        print_json(&serde_json::json!({
            "phases": phases,
            "completed": overall.completed,
            "total": overall.total,
            "percent": overall.percent(),
            "done": overall.is_done(),
        }))?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = doc
        .phases
        .iter()
        .map(|phase| {
            let progress = phase.progress();
            vec![
                phase.title.clone(),
                progress.completed.to_string(),
                progress.total.to_string(),
                format!("{}%", progress.percent()),
            ]
        })
        .collect();
    print_table(&["PHASE", "DONE", "TOTAL", "PCT"], rows);
    println!();
    let overall = doc.progress();
    if overall.is_done() {
        println!("{overall}. Roadmap finished.");
    } else {
        println!("{overall}");
    }
    Ok(())
}

fn render(root: &Path) -> anyhow::Result<()> {
    let doc = load(root)?;
    print!("{doc}");
    Ok(())
}
