use langswitch::{Language, LocalizationManager};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct LanguageRow<'a> {
    #[serde(flatten)]
    language: &'a Language,
    current: bool,
}

/// Available languages sorted by display string, built-in first.
pub fn sorted_languages(manager: &LocalizationManager) -> Vec<Language> {
    let mut languages: Vec<Language> = manager.available_languages().into_iter().collect();
    languages.sort_by_key(|l| (!l.is_builtin(), l.to_string()));
    languages
}

/// Print the available languages, marking the active one with `*`.
pub fn print_languages(manager: &LocalizationManager, json: bool) -> Result<(), String> {
    let current = manager.current_language();
    let languages = sorted_languages(manager);

    if json {
        let rows: Vec<LanguageRow> = languages
            .iter()
            .map(|language| LanguageRow {
                language,
                current: *language == current,
            })
            .collect();
        let out = serde_json::to_string_pretty(&rows).map_err(|e| e.to_string())?;
        println!("{}", out);
        return Ok(());
    }

    for language in &languages {
        let marker = if *language == current { "*" } else { " " };
        if language.is_builtin() {
            println!("{} {}  <built-in>", marker, language);
        } else {
            println!("{} {}  {}", marker, language, language.file_path().display());
        }
    }
    Ok(())
}

/// Print one resolved value per key.
pub fn print_values(manager: &LocalizationManager, keys: &[String]) {
    for key in keys {
        println!("{}", manager.get_localized_string(key));
    }
}

/// Print the active table sorted by key.
pub fn print_table(manager: &LocalizationManager, json: bool) -> Result<(), String> {
    let table = manager.current_localization();
    let sorted = table.sorted();

    if json {
        let out = serde_json::to_string_pretty(&sorted).map_err(|e| e.to_string())?;
        println!("{}", out);
        return Ok(());
    }

    println!("=== {} ===", manager.current_language());
    for (key, value) in sorted {
        println!("{} = {}", key, value);
    }
    Ok(())
}
