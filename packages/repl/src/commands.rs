//! REPL command parsing and execution.
//!
//! Commands:
//! - `list` - Show every product
//! - `show <id|resource>` - Show one product, or the whole collection
//! - `add <json>` - Insert a product from a JSON object of columns
//! - `set <id> <json>` - Update columns of a product
//! - `sell|inc|dec <id>` - Row actions on a product's quantity
//! - `rm <id>` / `rm-all` - Delete one product / every product
//! - `kind <resource>` - Classify a resource identifier
//! - `new` / `edit <id>` - Open an editor session
//! - `name|price|qty|image <text>` - Edit a field of the open session
//! - `form` - Show the open session
//! - `save` / `close` / `discard` / `delete` - Finish the open session
//! - `help` - Show help
//! - `exit` - Exit the REPL

use nu_ansi_term::{Color, Style};
use serde_json::Value as JsonValue;

use stockfs_core_store::{
    CloseDecision, EditorSession, EditorState, ProductActions, RejectReason, RowActions,
    ViewModel,
};
use stockfs_json_store::json_utils::{content_values_from_json, product_to_json};

use crate::store_context::{ContextError, InventoryContext};

/// Result of executing a command
pub enum CommandResult {
    /// Command succeeded, optionally with output to display
    Ok { display: Option<String> },
    /// Command failed with an error message
    Error(String),
    /// User requested to exit
    Exit,
    /// Show help
    Help,
}

impl CommandResult {
    fn ok_display(display: impl Into<String>) -> Self {
        CommandResult::Ok {
            display: Some(display.into()),
        }
    }

    fn ok_none() -> Self {
        CommandResult::Ok { display: None }
    }
}

impl From<ContextError> for CommandResult {
    fn from(e: ContextError) -> Self {
        CommandResult::Error(e.to_string())
    }
}

/// Command table as `(name, arguments, description)`; empty rows separate
/// groups in the help text.
pub const COMMANDS: &[(&str, &str, &str)] = &[
    ("list", "", "Show every product (alias: ls)"),
    ("show", "<id|resource>", "Show a product or collection as JSON"),
    ("add", "<json>", "Add a product, e.g. {\"name\": \"Widget\"}"),
    ("set", "<id> <json>", "Update columns of a product"),
    ("sell", "<id>", "Sell one unit"),
    ("inc", "<id>", "Add one unit"),
    ("dec", "<id>", "Remove one unit"),
    ("rm", "<id>", "Delete a product"),
    ("rm-all", "", "Delete every product"),
    ("kind", "<resource>", "Show the type of a resource"),
    ("", "", ""),
    ("new", "", "Open an editor for a new product"),
    ("edit", "<id>", "Open an editor on a product"),
    ("name", "<text>", "Set the name in the editor"),
    ("price", "<text>", "Set the price in the editor"),
    ("qty", "<text>", "Set the quantity in the editor"),
    ("image", "<ref>", "Choose an image reference in the editor"),
    ("form", "", "Show the editor"),
    ("save", "", "Save the editor"),
    ("close", "", "Close the editor if nothing changed"),
    ("discard", "", "Close the editor, dropping changes"),
    ("delete", "", "Delete the product being edited"),
    ("", "", ""),
    ("help", "", "Show this help message"),
    ("exit", "", "Exit the REPL (alias: quit, q)"),
];

const ALIASES: &[&str] = &["ls", "get", "?", "quit", "q"];

/// Whether `name` is a command or alias, ignoring case.
pub fn is_command(name: &str) -> bool {
    let name = name.to_lowercase();
    COMMANDS.iter().any(|&(cmd, _, _)| !cmd.is_empty() && cmd == name)
        || ALIASES.contains(&name.as_str())
}

/// Parse and execute a command
pub fn execute(input: &str, ctx: &mut InventoryContext) -> CommandResult {
    let input = input.trim();

    if input.is_empty() {
        return CommandResult::ok_none();
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    let result = match command.to_lowercase().as_str() {
        "help" | "?" => return CommandResult::Help,
        "exit" | "quit" | "q" => return CommandResult::Exit,
        "list" | "ls" => Ok(cmd_list(ctx)),
        "show" | "get" => cmd_show(args, ctx),
        "add" => cmd_add(args, ctx),
        "set" => cmd_set(args, ctx),
        "sell" | "inc" | "dec" => cmd_row_action(command, args, ctx),
        "rm" => cmd_rm(args, ctx),
        "rm-all" => cmd_rm_all(ctx),
        "kind" => cmd_kind(args, ctx),
        "new" => cmd_new(ctx),
        "edit" => cmd_edit(args, ctx),
        "name" | "price" | "qty" | "image" => cmd_field(command, args, ctx),
        "form" => cmd_form(ctx),
        "save" => cmd_save(ctx),
        "close" => cmd_close(ctx),
        "discard" => cmd_discard(ctx),
        "delete" => cmd_delete(ctx),
        _ => {
            return CommandResult::Error(format!(
                "Unknown command: '{}'. Type 'help' for available commands.",
                command
            ))
        }
    };

    result.unwrap_or_else(CommandResult::from)
}

/// Format help text
pub fn format_help() -> String {
    let cmd_style = Style::new().bold().fg(Color::Cyan);
    let arg_style = Style::new().fg(Color::Yellow);
    let desc_style = Style::new().fg(Color::White);

    let mut help = String::new();
    help.push_str(&format!(
        "{}\n\n",
        Style::new().bold().paint("stockfs Commands")
    ));


    for &(cmd, args, desc) in COMMANDS {
        if cmd.is_empty() {
            help.push('\n');
        } else {
            help.push_str(&format!(
                "  {:<12} {:<20} {}\n",
                cmd_style.paint(cmd),
                arg_style.paint(args),
                desc_style.paint(desc)
            ));
        }
    }

    help
}

type CmdResult = Result<CommandResult, ContextError>;

fn cmd_list(ctx: &InventoryContext) -> CommandResult {
    let rows = ctx.list().rows();
    if rows.is_empty() {
        return CommandResult::ok_display(format!("{}", Color::Yellow.paint("(no products)")));
    }
    CommandResult::ok_display(format_rows(&rows))
}

fn cmd_show(args: &str, ctx: &InventoryContext) -> CmdResult {
    let resource = ctx.parse_resource(args)?;
    let value = match ctx.resolver().query(&resource)?.into_rows() {
        Some(rows) => JsonValue::Array(rows.iter().map(product_to_json).collect()),
        None => product_to_json(&ctx.row(&resource)?),
    };
    Ok(CommandResult::ok_display(format_json(&value)))
}

fn cmd_add(args: &str, ctx: &InventoryContext) -> CmdResult {
    if args.is_empty() {
        return Ok(CommandResult::Error("Usage: add <json>".to_string()));
    }
    let json: JsonValue = serde_json::from_str(args)?;
    let values = content_values_from_json(&json)?;

    let resolver = ctx.resolver();
    let item = resolver.insert_values(&resolver.collection(), &values)?;
    Ok(CommandResult::ok_display(format!(
        "{} {}",
        Color::Green.paint("Created"),
        item
    )))
}

fn cmd_set(args: &str, ctx: &InventoryContext) -> CmdResult {
    let Some((id_str, json_str)) = parse_set_args(args) else {
        return Ok(CommandResult::Error("Usage: set <id> <json>".to_string()));
    };
    let item = ctx.parse_item(&id_str)?;
    let json: JsonValue = serde_json::from_str(&json_str)?;
    let values = content_values_from_json(&json)?;

    match ctx.resolver().update_values(&item, &values)? {
        0 => Ok(not_updated(&item)),
        n => Ok(CommandResult::ok_display(format!(
            "{} {} ({} row)",
            Color::Green.paint("Updated"),
            item,
            n
        ))),
    }
}

fn cmd_row_action(command: &str, args: &str, ctx: &InventoryContext) -> CmdResult {
    let item = ctx.parse_item(args)?;
    let row = ctx.row(&item)?;
    let actions = ProductActions::new(ctx.resolver());

    let affected = match command.to_lowercase().as_str() {
        "sell" => actions.sell(&row)?,
        "inc" => actions.increment(&row)?,
        _ => actions.decrement(&row)?,
    };
    if affected == 0 {
        return Ok(not_updated(&item));
    }

    let quantity = ctx.row(&item)?.quantity;
    Ok(CommandResult::ok_display(format!(
        "{} quantity: {}",
        item,
        Color::Cyan.paint(quantity.to_string())
    )))
}

fn cmd_rm(args: &str, ctx: &InventoryContext) -> CmdResult {
    let item = ctx.parse_item(args)?;
    match ctx.resolver().delete(&item)? {
        0 => Ok(CommandResult::Error(format!("Error deleting {}: no such product", item))),
        _ => Ok(CommandResult::ok_display(format!(
            "{} {}",
            Color::Green.paint("Deleted"),
            item
        ))),
    }
}

fn cmd_rm_all(ctx: &InventoryContext) -> CmdResult {
    let resolver = ctx.resolver();
    let removed = resolver.delete(&resolver.collection())?;
    Ok(CommandResult::ok_display(format!(
        "{} {} product(s)",
        Color::Green.paint("Deleted"),
        removed
    )))
}

fn cmd_kind(args: &str, ctx: &InventoryContext) -> CmdResult {
    let resource = ctx.parse_resource(args)?;
    let mime = ctx.resolver().mime_type(&resource)?;
    Ok(CommandResult::ok_display(format!("{}: {}", resource, mime)))
}

fn cmd_new(ctx: &mut InventoryContext) -> CmdResult {
    ctx.open_session(EditorSession::new())?;
    Ok(CommandResult::ok_display(format!(
        "{}",
        Color::Cyan.paint("Editing a new product")
    )))
}

fn cmd_edit(args: &str, ctx: &mut InventoryContext) -> CmdResult {
    let item = ctx.parse_item(args)?;
    let session = EditorSession::open(ctx.resolver(), &item)?;
    let form = format_form(&session);
    ctx.open_session(session)?;
    Ok(CommandResult::ok_display(form))
}

fn cmd_field(command: &str, args: &str, ctx: &mut InventoryContext) -> CmdResult {
    let session = ctx.session_mut()?;
    match command.to_lowercase().as_str() {
        "name" => session.set_name(args),
        "price" => session.set_price(args),
        "qty" => session.set_quantity(args),
        _ => {
            if args.is_empty() {
                return Ok(CommandResult::Error("Usage: image <ref>".to_string()));
            }
            session.choose_image(args)
        }
    }
    Ok(CommandResult::ok_none())
}

fn cmd_form(ctx: &mut InventoryContext) -> CmdResult {
    let session = ctx.session_mut()?;
    Ok(CommandResult::ok_display(format_form(session)))
}

fn cmd_save(ctx: &mut InventoryContext) -> CmdResult {
    let session = ctx.take_session()?;
    let resolver = ctx.resolver().clone();

    match session.save(&resolver) {
        Ok(id) => Ok(CommandResult::ok_display(format!(
            "{} {}",
            Color::Green.paint("Saved"),
            resolver.item(id)
        ))),
        // A blank new product closes the editor without writing anything.
        Err(rejected) if matches!(rejected.reason, RejectReason::Empty) => {
            Ok(CommandResult::ok_display(format!(
                "{}",
                Color::Yellow.paint("Nothing to save")
            )))
        }
        Err(rejected) => {
            let message = match &rejected.reason {
                RejectReason::NotFound { id } => {
                    format!("Error updating product: no product with id {}", id)
                }
                reason => format!("Error saving product: {}", reason),
            };
            ctx.restore_session(rejected.session);
            Ok(CommandResult::Error(message))
        }
    }
}

fn cmd_close(ctx: &mut InventoryContext) -> CmdResult {
    let decision = match ctx.session() {
        Some(session) => session.request_close(),
        None => return Err(ContextError::Session("No editor open.".to_string())),
    };
    match decision {
        CloseDecision::CloseNow => {
            ctx.take_session()?;
            Ok(CommandResult::ok_none())
        }
        CloseDecision::ConfirmDiscard => Ok(CommandResult::Error(
            "Discard your changes and quit editing? Use 'discard' to drop them or 'save' to keep them."
                .to_string(),
        )),
    }
}

fn cmd_discard(ctx: &mut InventoryContext) -> CmdResult {
    ctx.take_session()?;
    Ok(CommandResult::ok_display(format!(
        "{}",
        Color::Yellow.paint("Changes discarded")
    )))
}

fn cmd_delete(ctx: &mut InventoryContext) -> CmdResult {
    let can_delete = ctx.session_mut()?.can_delete();
    if !can_delete {
        return Ok(CommandResult::Error(
            "This product has not been saved yet; use 'discard' instead.".to_string(),
        ));
    }

    let session = ctx.take_session()?;
    let resolver = ctx.resolver().clone();
    match session.delete(&resolver) {
        Ok(id) => Ok(CommandResult::ok_display(format!(
            "{} {}",
            Color::Green.paint("Deleted"),
            resolver.item(id)
        ))),
        Err(rejected) => {
            let message = format!("Error deleting product: {}", rejected.reason);
            ctx.restore_session(rejected.session);
            Ok(CommandResult::Error(message))
        }
    }
}

fn not_updated(item: &stockfs_core_store::ResourceId) -> CommandResult {
    CommandResult::Error(format!("Error updating {}: no such product", item))
}

/// Split `set` arguments into the id and the JSON payload
fn parse_set_args(args: &str) -> Option<(String, String)> {
    let args = args.trim();
    if args.is_empty() || args.starts_with('{') {
        return None;
    }

    let split = args.find(char::is_whitespace)?;
    let (id, json) = args.split_at(split);
    let json = json.trim();
    if json.is_empty() {
        return None;
    }
    Some((id.to_string(), json.to_string()))
}

fn format_rows(rows: &[ViewModel]) -> String {
    let header = Style::new().bold();
    let mut out = format!(
        "{}\n",
        header.paint(format!(
            "{:>5}  {:<24} {:>10} {:>8}  {}",
            "id", "name", "price", "qty", "image"
        ))
    );
    for row in rows {
        out.push_str(&format!(
            "{:>5}  {:<24} {:>10} {:>8}  {}\n",
            row.id, row.name, row.price_display, row.quantity_display, row.image_ref
        ));
    }
    out.pop();
    out
}

fn format_form(session: &EditorSession) -> String {
    let label = Style::new().bold();
    let title = match session.state() {
        EditorState::New => "New product".to_string(),
        EditorState::Editing(id) => format!("Editing product {}", id),
    };
    let marker = if session.is_dirty() { " (modified)" } else { "" };

    format!(
        "{}{}\n  {:<8} {}\n  {:<8} {}\n  {:<8} {}\n  {:<8} {}",
        Color::Cyan.paint(title),
        Color::Yellow.paint(marker),
        label.paint("name"),
        session.name(),
        label.paint("price"),
        session.price_text(),
        label.paint("qty"),
        session.quantity_text(),
        label.paint("image"),
        session.pending_image_ref().unwrap_or("(default)"),
    )
}

/// Format JSON with syntax highlighting
fn format_json(value: &JsonValue) -> String {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());

    let mut result = String::new();
    let mut chars = pretty.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                // Paint the whole string literal at once.
                let mut literal = String::from('"');
                let mut escaped = false;
                for next in chars.by_ref() {
                    literal.push(next);
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == '"' {
                        break;
                    }
                }
                let key = chars.peek() == Some(&':');
                let color = if key { Color::Blue } else { Color::Green };
                result.push_str(&color.paint(literal).to_string());
            }
            '{' | '}' | '[' | ']' => {
                result.push_str(&Color::White.bold().paint(c.to_string()).to_string())
            }
            _ if c.is_ascii_digit() || c == '-' => {
                result.push_str(&Color::Cyan.paint(c.to_string()).to_string())
            }
            _ => result.push(c),
        }
    }

    result
        .replace("null", &Color::Yellow.paint("null").to_string())
        .replace("true", &Color::Yellow.paint("true").to_string())
        .replace("false", &Color::Yellow.paint("false").to_string())
}
