use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use food_tracker::{
    DayName, LocalCache, MealField, StoreConfig, WeekForm, WeekSchedule, WeekStoreAdapter,
    calendar, guidance, load_week_from_csv, load_week_from_json, options, save_week_to_csv,
    save_week_to_json,
};
use tracing_subscriber::EnvFilter;

const COLUMNS: [&str; 8] = [
    "Jour",
    "Matin",
    "Légume",
    "Viande/Poisson",
    "Fruit",
    "Goûter",
    "Soir",
    "Remarques",
];

fn cell_width(s: &str) -> usize {
    s.chars().count()
}

fn render_week_as_text_table(schedule: &WeekSchedule) -> String {
    let rows: Vec<Vec<String>> = schedule
        .iter()
        .map(|(day, entry)| {
            let mut row = vec![day.to_string()];
            row.extend(MealField::ALL.iter().map(|field| entry.get(*field).to_string()));
            row
        })
        .collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|name| cell_width(name)).collect();
    for row in &rows {
        for (ci, value) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell_width(value));
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let push_row = |out: &mut String, cells: &[&str]| {
        out.push('|');
        for (ci, value) in cells.iter().enumerate() {
            out.push(' ');
            out.push_str(value);
            out.push_str(&" ".repeat(widths[ci].saturating_sub(cell_width(value))));
            out.push_str(" |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &COLUMNS);
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        push_row(&mut out, &cells);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_week(form: &WeekForm) {
    let dirty = if form.is_dirty() { ", non sauvegardée" } else { "" };
    println!(
        "{} [{}{}]\n{}",
        form.week_label(),
        form.status().label(),
        dirty,
        render_week_as_text_table(form.schedule())
    );
}

fn print_message(form: &WeekForm) {
    if let Some(message) = form.message() {
        println!("{}", message);
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the current week\n  set <day> <field> <value...>       Set a field (option text, number or prefix)\n  clear <day> <field>                Clear a field\n  options <field>                    List the choices for a field\n  next | prev | today                Move between weeks\n  goto <YYYY-MM-DD>                  Open the week containing a date\n  new                                Start the week after the latest stored one\n  save                               Save the whole week\n  saveday <day>                      Save a single day\n  reset                              Delete the stored week\n  history                            List stored weeks\n  status                             Check the store for this week\n  pdf [dir]                          Export the week as PDF\n  export csv|json <path>             Write the week to a file\n  import csv|json <path>             Replace the week from a file\n  info                               Feeding notes and recommendations\n  avoid                              Foods to avoid\n  quit|exit                          Exit\n\nFields: morning, vegetable, protein, fruit_lunch, snack, evening, remarks"
    );
}

fn print_options(field: MealField) {
    match field.options() {
        Some(list) => {
            println!("{}:", field.label());
            for (i, option) in list.iter().enumerate() {
                println!("  {:>2}. {}", i + 1, option);
            }
        }
        None => println!("{}: texte libre", field.label()),
    }
}

fn print_guidance() {
    println!("Informations importantes:");
    for note in guidance::IMPORTANT_NOTES {
        println!("  {} : {}", note.title, note.content);
    }
    println!("Recommandations:");
    for note in guidance::RECOMMENDATIONS {
        println!("  {} : {}", note.title, note.content);
    }
}

fn print_avoid() {
    println!("Légumes à éviter: {}", guidance::FORBIDDEN_VEGETABLES.join(", "));
    println!("Viandes/poissons à éviter:");
    for item in guidance::FORBIDDEN_PROTEINS {
        println!("  - {}", item);
    }
    println!("Autres restrictions:");
    for item in guidance::OTHER_RESTRICTIONS {
        println!("  - {}", item);
    }
}

fn parse_day(s: Option<&str>) -> Option<DayName> {
    s.and_then(|s| s.parse().ok())
}

fn parse_field(s: Option<&str>) -> Option<MealField> {
    s.and_then(|s| s.parse().ok())
}

fn open_adapter(config: &StoreConfig) -> io::Result<WeekStoreAdapter> {
    let cache = LocalCache::open(&config.cache_dir).map_err(io::Error::other)?;
    match config.connect() {
        Ok(table) => Ok(WeekStoreAdapter::new(table, cache)),
        Err(e) => {
            println!("Store unavailable ({}), working from the local cache.", e);
            Ok(WeekStoreAdapter::offline(cache))
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = StoreConfig::from_env();
    let adapter = open_adapter(&config)?;
    let store = adapter.describe();
    let mut form = WeekForm::open(adapter, Local::now().date_naive()).await;

    println!("Suivi alimentaire (CLI) - type 'help' for commands");
    println!("Store: {}\n", store);
    print_message(&form);
    print_week(&form);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_week(&form),
            "set" => {
                let (Some(day), Some(field)) = (parse_day(parts.next()), parse_field(parts.next()))
                else {
                    println!("Usage: set <day> <field> <value...>");
                    continue;
                };
                let raw = parts.collect::<Vec<_>>().join(" ");
                let Some(value) = options::resolve_option(field, &raw) else {
                    println!("'{}' matches no single option for {}.", raw, field);
                    print_options(field);
                    continue;
                };
                match form.set_field(day, field, &value) {
                    Ok(()) => {
                        println!("{} {} = {}", day, field, value);
                        print_message(&form);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "clear" => {
                let (Some(day), Some(field)) = (parse_day(parts.next()), parse_field(parts.next()))
                else {
                    println!("Usage: clear <day> <field>");
                    continue;
                };
                match form.set_field(day, field, "") {
                    Ok(()) => println!("{} {} cleared.", day, field),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "options" => match parse_field(parts.next()) {
                Some(field) => print_options(field),
                None => println!("Usage: options <field>"),
            },
            "next" | "prev" | "today" => {
                match cmd {
                    "next" => form.next_week().await,
                    "prev" => form.previous_week().await,
                    _ => form.current_week().await,
                }
                print_message(&form);
                print_week(&form);
            }
            "goto" => {
                let Some(date) = parts
                    .next()
                    .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                else {
                    println!("Usage: goto <YYYY-MM-DD>");
                    continue;
                };
                form.go_to(date).await;
                print_message(&form);
                print_week(&form);
            }
            "new" => {
                form.new_week().await;
                print_message(&form);
                print_week(&form);
            }
            "save" => {
                form.save().await;
                print_message(&form);
            }
            "saveday" => match parse_day(parts.next()) {
                Some(day) => {
                    form.save_day(day).await;
                    print_message(&form);
                }
                None => println!("Usage: saveday <day>"),
            },
            "reset" => {
                form.reset().await;
                print_message(&form);
            }
            "history" => {
                let keys = form.history().await;
                if keys.is_empty() {
                    println!("No stored weeks.");
                }
                for key in keys {
                    println!("  {}  {}", calendar::week_key(key), calendar::format_week_range(key));
                }
            }
            "status" => {
                let status = form.refresh_status().await;
                println!("{} [{}] via {}", form.week_label(), status.label(), form.adapter().describe());
            }
            "pdf" => {
                let dir = parts.next().map_or_else(|| PathBuf::from("."), PathBuf::from);
                form.export_pdf(&dir);
                print_message(&form);
            }
            "export" => {
                let (Some(format), Some(path)) = (parts.next(), parts.next()) else {
                    println!("Usage: export csv|json <path>");
                    continue;
                };
                let res = match format {
                    "csv" => save_week_to_csv(form.schedule(), Path::new(path)),
                    "json" => save_week_to_json(form.schedule(), Path::new(path)),
                    _ => {
                        println!("Usage: export csv|json <path>");
                        continue;
                    }
                };
                match res {
                    Ok(()) => println!("Week exported to {}", path),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "import" => {
                let (Some(format), Some(path)) = (parts.next(), parts.next()) else {
                    println!("Usage: import csv|json <path>");
                    continue;
                };
                let res = match format {
                    "csv" => load_week_from_csv(Path::new(path)),
                    "json" => load_week_from_json(Path::new(path)),
                    _ => {
                        println!("Usage: import csv|json <path>");
                        continue;
                    }
                };
                match res {
                    Ok(schedule) => {
                        form.replace_schedule(schedule);
                        println!("Week loaded from {}", path);
                        print_week(&form);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "info" => print_guidance(),
            "avoid" => print_avoid(),
            _ => println!("Unknown command. Type 'help'."),
        }
    }
    Ok(())
}
