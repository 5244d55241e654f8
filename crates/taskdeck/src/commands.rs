use anyhow::{Result, anyhow, bail};
use taskdeck_app::{CreateTaskInput, RemoteStore, TaskService, UpdateTaskInput};
use taskdeck_core::{Tag, TagId, TaskId, sort_by_priority};

use crate::Command;

pub fn run<S: RemoteStore>(command: Command, service: &mut TaskService<S>) -> Result<()> {
    match command {
        Command::Ls { done } => handle_ls(service, done),
        Command::Add {
            name,
            description,
            due,
            tags,
        } => handle_add(service, name, description, due, tags),
        Command::Edit {
            id,
            name,
            description,
            due,
            tags,
        } => handle_edit(service, TaskId(id), name, description, due, tags),
        Command::Done { id } => handle_done(service, TaskId(id)),
        Command::Rm { id } => handle_rm(service, TaskId(id)),
        Command::Show { id } => handle_show(service, TaskId(id)),
        Command::Search { term } => handle_search(service, &term),
        Command::Tags => handle_tags(service),
        Command::TagAdd { name, description } => handle_tag_add(service, &name, description),
        Command::TagRename {
            id,
            name,
            description,
        } => handle_tag_rename(service, TagId(id), &name, description),
        Command::TagRm { id } => handle_tag_rm(service, TagId(id)),
    }
}

fn failure<S: RemoteStore>(service: &TaskService<S>, what: &str) -> anyhow::Error {
    service
        .last_error()
        .map_or_else(|| anyhow!("{what} failed"), |err| anyhow!("{what} failed: {err}"))
}

fn ensure_loaded<S: RemoteStore>(service: &mut TaskService<S>) -> Result<()> {
    if service.load_all_tasks() {
        Ok(())
    } else {
        Err(failure(service, "loading tasks"))
    }
}

fn handle_ls<S: RemoteStore>(service: &mut TaskService<S>, done: bool) -> Result<()> {
    ensure_loaded(service)?;
    let tasks = if done {
        service.completed_tasks()
    } else {
        service.pending_tasks()
    };
    if tasks.is_empty() {
        println!("no tasks");
        return Ok(());
    }
    for task in tasks {
        println!("{}", list_row(task.id, &service.task_line(task)));
    }
    Ok(())
}

fn handle_add<S: RemoteStore>(
    service: &mut TaskService<S>,
    name: String,
    description: Option<String>,
    due: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    ensure_loaded(service)?;
    let Some(task) = service.create_task(CreateTaskInput {
        name,
        description,
        due_date: due,
        tags,
    }) else {
        return Err(failure(service, "creating the task"));
    };
    println!("created task {}: {}", task.id, task.name);
    Ok(())
}

fn handle_edit<S: RemoteStore>(
    service: &mut TaskService<S>,
    id: TaskId,
    name: Option<String>,
    description: Option<String>,
    due: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    ensure_loaded(service)?;
    let Some(task) = service.update_task(
        id,
        UpdateTaskInput {
            name,
            description,
            due_date: due,
            tags,
        },
    ) else {
        return Err(failure(service, "updating the task"));
    };
    println!("updated task {}: {}", task.id, task.name);
    Ok(())
}

fn handle_done<S: RemoteStore>(service: &mut TaskService<S>, id: TaskId) -> Result<()> {
    ensure_loaded(service)?;
    let Some(task) = service.toggle_completion(id) else {
        return Err(failure(service, "toggling completion"));
    };
    let state = if task.is_completed { "completed" } else { "pending" };
    println!("task {} is now {state}", task.id);
    Ok(())
}

fn handle_rm<S: RemoteStore>(service: &mut TaskService<S>, id: TaskId) -> Result<()> {
    if service.delete_task(id) {
        println!("deleted task {id}");
        Ok(())
    } else {
        Err(failure(service, "deleting the task"))
    }
}

fn handle_show<S: RemoteStore>(service: &mut TaskService<S>, id: TaskId) -> Result<()> {
    ensure_loaded(service)?;
    let Some(task) = service.task_by_id(id) else {
        bail!("task {id} not found");
    };
    print!("{}", service.task_details(task));
    Ok(())
}

fn handle_search<S: RemoteStore>(service: &mut TaskService<S>, term: &str) -> Result<()> {
    let mut matches = service.search_by_tag_name(term);
    if let Some(err) = service.last_error() {
        bail!("search failed: {err}");
    }
    if matches.is_empty() {
        println!("no tasks match '{term}'");
        return Ok(());
    }
    sort_by_priority(&mut matches);
    for task in &matches {
        println!("{}", list_row(task.id, &service.task_line(task)));
    }
    Ok(())
}

fn handle_tags<S: RemoteStore>(service: &mut TaskService<S>) -> Result<()> {
    ensure_loaded(service)?;
    if service.tags().is_empty() {
        println!("no tags");
        return Ok(());
    }
    let rows: Vec<String> = service
        .tags()
        .iter()
        .map(|tag| {
            tag_row(
                tag,
                service.count_tasks_with_tag(tag),
                service.count_completed_tasks_with_tag(tag),
            )
        })
        .collect();
    for row in rows {
        println!("{row}");
    }
    Ok(())
}

fn handle_tag_add<S: RemoteStore>(
    service: &mut TaskService<S>,
    name: &str,
    description: Option<String>,
) -> Result<()> {
    ensure_loaded(service)?;
    let Some(tag) = service.create_tag(name, description) else {
        return Err(failure(service, "creating the tag"));
    };
    println!("created tag {}: {}", tag.id, tag.name);
    Ok(())
}

fn handle_tag_rename<S: RemoteStore>(
    service: &mut TaskService<S>,
    id: TagId,
    name: &str,
    description: Option<String>,
) -> Result<()> {
    ensure_loaded(service)?;
    let tag = find_tag(service, id)?;
    let Some(updated) = service.update_tag(&tag, name, description) else {
        return Err(failure(service, "renaming the tag"));
    };
    println!("renamed tag {} to {}", updated.id, updated.name);
    Ok(())
}

fn handle_tag_rm<S: RemoteStore>(service: &mut TaskService<S>, id: TagId) -> Result<()> {
    ensure_loaded(service)?;
    let tag = find_tag(service, id)?;
    if service.delete_tag(&tag) {
        println!("deleted tag {id}");
        Ok(())
    } else {
        Err(failure(service, "deleting the tag"))
    }
}

fn find_tag<S: RemoteStore>(service: &TaskService<S>, id: TagId) -> Result<Tag> {
    service
        .tags()
        .iter()
        .find(|tag| tag.id == id)
        .cloned()
        .ok_or_else(|| anyhow!("tag {id} not found"))
}

fn list_row(id: TaskId, line: &str) -> String {
    format!("{id:>6}  {line}")
}

fn tag_row(tag: &Tag, total: usize, completed: usize) -> String {
    format!("{:>6}  {}  {total} tasks ({completed} done)", tag.id, tag.name)
}
