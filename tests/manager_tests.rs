use langswitch::{
    Language, LanguageChanged, LanguageObserver, LocalizationManager, LocalizationOptions,
    TranslationTable, traits::Parser,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

const FRENCH: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Root>
  <LanguageName>Français (fr-FR)</LanguageName>
  <SelectLanguage>Choisir la langue : </SelectLanguage>
  <Greeting>Bonjour</Greeting>
</Root>
"#;

const GERMAN: &str = r#"<Root><LanguageName>Deutsch</LanguageName><Greeting>Hallo</Greeting></Root>"#;

fn manager_in(dir: &Path) -> LocalizationManager {
    LocalizationManager::new(
        LocalizationOptions::new()
            .with_language_dir(dir)
            .with_diagnostic_mode(false),
    )
}

fn counting_observer() -> (Arc<AtomicUsize>, Arc<dyn LanguageObserver>) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let observer: Arc<dyn LanguageObserver> = Arc::new(move |_: &LanguageChanged| {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    (count, observer)
}

#[test]
fn test_discovery_skips_corrupt_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("fr.xaml"), FRENCH).unwrap();
    fs::write(
        temp_dir.path().join("corrupt.xaml"),
        "<Root><LanguageName>Cassé</LanguageName><Select",
    )
    .unwrap();

    let manager = manager_in(temp_dir.path());
    let languages = manager.discover_languages();

    assert_eq!(languages.len(), 2);
    assert!(languages.contains(Language::builtin()));
    assert!(languages.contains(&Language::new("", temp_dir.path().join("fr.xaml"))));
    assert_eq!(manager.available_languages(), languages);
}

#[test]
fn test_discovery_always_contains_builtin() {
    let temp_dir = TempDir::new().unwrap();

    let absent = manager_in(&temp_dir.path().join("missing"));
    let languages = absent.discover_languages();
    assert_eq!(languages.len(), 1);
    assert!(languages.contains(Language::builtin()));

    let empty = manager_in(temp_dir.path());
    let languages = empty.discover_languages();
    assert_eq!(languages.len(), 1);
    assert!(languages.contains(Language::builtin()));
}

#[test]
fn test_discovery_replaces_previous_set() {
    let temp_dir = TempDir::new().unwrap();
    let de = temp_dir.path().join("de.xaml");
    fs::write(&de, GERMAN).unwrap();
    fs::write(temp_dir.path().join("fr.xaml"), FRENCH).unwrap();

    let manager = manager_in(temp_dir.path());
    assert_eq!(manager.discover_languages().len(), 3);

    fs::remove_file(&de).unwrap();
    let languages = manager.discover_languages();
    assert_eq!(languages.len(), 2);
    assert!(!languages.contains(&Language::new("Deutsch", &de)));
}

#[test]
fn test_set_builtin_always_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let fr = temp_dir.path().join("fr.xaml");
    fs::write(&fr, FRENCH).unwrap();
    let manager = manager_in(temp_dir.path());

    assert!(manager.set_language_from_file(&fr));
    assert!(!manager.current_language().is_builtin());

    assert!(manager.set_language(Language::builtin()));
    assert!(manager.current_language().is_builtin());
    assert!(Arc::ptr_eq(
        &manager.current_localization(),
        &TranslationTable::builtin()
    ));
}

#[test]
fn test_set_missing_file_keeps_state() {
    let temp_dir = TempDir::new().unwrap();
    let fr = temp_dir.path().join("fr.xaml");
    fs::write(&fr, FRENCH).unwrap();
    let manager = manager_in(temp_dir.path());
    assert!(manager.set_language_from_file(&fr));

    let before_language = manager.current_language();
    let before_table = manager.current_localization();

    let gone = Language::new("Deutsch", temp_dir.path().join("de.xaml"));
    assert!(!manager.set_language(&gone));
    assert!(!manager.set_language_from_file(temp_dir.path().join("de.xaml")));

    assert_eq!(manager.current_language(), before_language);
    assert_eq!(manager.current_language().name(), before_language.name());
    assert!(Arc::ptr_eq(&manager.current_localization(), &before_table));
}

#[test]
fn test_set_corrupt_file_keeps_state() {
    let temp_dir = TempDir::new().unwrap();
    let bad = temp_dir.path().join("bad.xaml");
    fs::write(&bad, "<Root><A>a</B></Root>").unwrap();
    let manager = manager_in(temp_dir.path());

    let before_table = manager.current_localization();
    assert!(!manager.set_language(&Language::new("Bad", &bad)));
    assert!(manager.current_language().is_builtin());
    assert!(Arc::ptr_eq(&manager.current_localization(), &before_table));
}

#[test]
fn test_set_language_uses_given_name() {
    let temp_dir = TempDir::new().unwrap();
    let de = temp_dir.path().join("de.xaml");
    fs::write(&de, GERMAN).unwrap();
    let manager = manager_in(temp_dir.path());

    assert!(manager.set_language(&Language::new("German", &de)));
    assert_eq!(manager.current_language().name(), "German");
    assert_eq!(manager.get_localized_string("Greeting"), "Hallo");
}

#[test]
fn test_set_language_from_file_reads_name() {
    let temp_dir = TempDir::new().unwrap();
    let de = temp_dir.path().join("de.xaml");
    let anon = temp_dir.path().join("anon.xaml");
    fs::write(&de, GERMAN).unwrap();
    fs::write(&anon, "<Root><Greeting>Hi</Greeting></Root>").unwrap();
    let manager = manager_in(temp_dir.path());

    assert!(manager.set_language_from_file(&de));
    assert_eq!(manager.current_language().name(), "Deutsch");
    assert_eq!(manager.current_language().to_string(), "Deutsch (de)");

    assert!(manager.set_language_from_file(&anon));
    assert_eq!(manager.current_language().name(), "");
    assert_eq!(manager.current_language().to_string(), "(anon)");
}

#[test]
fn test_lookup_tiers() {
    let temp_dir = TempDir::new().unwrap();
    let fr = temp_dir.path().join("fr.xaml");
    fs::write(&fr, FRENCH).unwrap();
    let manager = manager_in(temp_dir.path());
    assert!(manager.set_language_from_file(&fr));

    // Current table.
    assert_eq!(manager.get_localized_string("Greeting"), "Bonjour");
    assert_eq!(
        manager.get_localized_string("SelectLanguage"),
        "Choisir la langue : "
    );
    // Built-in table only.
    assert_eq!(
        manager.get_localized_string("UpdateLanguagesToolTip"),
        TranslationTable::builtin()
            .get("UpdateLanguagesToolTip")
            .unwrap()
    );
    // Neither.
    assert_eq!(manager.get_localized_string("Missing"), "Missing");

    manager.set_diagnostic_mode(true);
    assert_eq!(
        manager.get_localized_string("Missing"),
        format!("|\"{}\":Missing|", fr.display())
    );
}

#[test]
fn test_subscribe_and_notification_counts() {
    let temp_dir = TempDir::new().unwrap();
    let fr = temp_dir.path().join("fr.xaml");
    fs::write(&fr, FRENCH).unwrap();
    let manager = manager_in(temp_dir.path());

    let (count, observer) = counting_observer();
    let mut subscription = manager.subscribe(observer);
    assert_eq!(count.load(Ordering::SeqCst), 1);

    assert!(manager.set_language_from_file(&fr));
    assert_eq!(count.load(Ordering::SeqCst), 2);

    assert!(manager.set_language(Language::builtin()));
    assert_eq!(count.load(Ordering::SeqCst), 3);

    // Failed switches do not notify.
    assert!(!manager.set_language_from_file(temp_dir.path().join("nope.xaml")));
    assert_eq!(count.load(Ordering::SeqCst), 3);

    subscription.unsubscribe();
    assert!(manager.observers().is_empty());
    assert!(manager.set_language_from_file(&fr));
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[test]
fn test_dropping_duplicate_subscription_keeps_original() {
    let manager = manager_in(TempDir::new().unwrap().path());

    let (count, observer) = counting_observer();
    let _subscription = manager.subscribe(Arc::clone(&observer));
    drop(manager.subscribe(observer));
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(manager.observers().len(), 1);

    assert!(manager.set_language(Language::builtin()));
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_observer_sees_new_state() {
    let temp_dir = TempDir::new().unwrap();
    let de = temp_dir.path().join("de.xaml");
    fs::write(&de, GERMAN).unwrap();
    let manager = Arc::new(manager_in(temp_dir.path()));

    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let view = Arc::downgrade(&manager);
    let _subscription = manager.subscribe(Arc::new(move |_: &LanguageChanged| {
        if let Some(manager) = view.upgrade() {
            sink.lock()
                .unwrap()
                .push(manager.get_localized_string("Greeting"));
        }
    }));

    assert!(manager.set_language_from_file(&de));
    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), ["Greeting", "Hallo"]);
}

#[test]
fn test_panicking_observer_does_not_block_others() {
    let manager = LocalizationManager::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let faulty_calls = Arc::clone(&calls);
    let _faulty = manager.subscribe(Arc::new(move |_: &LanguageChanged| {
        if faulty_calls.fetch_add(1, Ordering::SeqCst) > 0 {
            panic!("view model exploded");
        }
    }));
    let (count, observer) = counting_observer();
    let _healthy = manager.subscribe(observer);

    assert!(manager.set_language(Language::builtin()));
    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_match_locale() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("fr-FR.xaml"), FRENCH).unwrap();
    fs::write(temp_dir.path().join("de-DE.xaml"), GERMAN).unwrap();
    let manager = manager_in(temp_dir.path());
    manager.discover_languages();

    assert!(manager.match_locale("DE-de"));
    assert_eq!(manager.current_language().name(), "Deutsch");

    assert!(manager.match_locale("fr-fr"));
    assert_eq!(manager.current_language().file_name(), "fr-FR");

    assert!(!manager.match_locale("ja-JP"));
    assert!(!manager.match_locale(""));
    assert_eq!(manager.current_language().file_name(), "fr-FR");
}

#[test]
fn test_match_locale_fails_when_file_vanished() {
    let temp_dir = TempDir::new().unwrap();
    let de = temp_dir.path().join("de-DE.xaml");
    fs::write(&de, GERMAN).unwrap();
    let manager = manager_in(temp_dir.path());
    manager.discover_languages();
    fs::remove_file(&de).unwrap();

    assert!(!manager.match_locale("de-DE"));
    assert!(manager.current_language().is_builtin());
}

#[test]
fn test_save_builtin_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let lang_dir = temp_dir.path().join("Lang");
    let manager = manager_in(&lang_dir);

    let path = manager.save_builtin_localization().unwrap();
    assert_eq!(path, lang_dir.join(".Builtin.xaml"));

    let reparsed = TranslationTable::read_from(&path).unwrap();
    assert_eq!(&reparsed, TranslationTable::builtin().as_ref());

    // The exported template is never offered as a language.
    let languages = manager.discover_languages();
    assert_eq!(languages.len(), 1);
}

#[test]
fn test_save_builtin_overwrites_longer_file() {
    let temp_dir = TempDir::new().unwrap();
    let manager = manager_in(temp_dir.path());
    let target = temp_dir.path().join(".Builtin.xaml");
    fs::write(&target, "x".repeat(4096)).unwrap();

    manager.save_builtin_localization().unwrap();
    let reparsed = TranslationTable::read_from(&target).unwrap();
    assert_eq!(&reparsed, TranslationTable::builtin().as_ref());
}

#[test]
fn test_utf16_language_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ja.xaml");
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "<Root><LanguageName>日本語</LanguageName></Root>".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    fs::write(&path, bytes).unwrap();

    let manager = manager_in(temp_dir.path());
    let languages = manager.discover_languages();
    let ja = languages.iter().find(|l| l.file_name() == "ja").unwrap();
    assert_eq!(ja.name(), "日本語");
    assert!(manager.set_language(ja));
    assert_eq!(manager.get_localized_string("LanguageName"), "日本語");
}

#[test]
fn test_latin1_file_without_bom_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fr.xaml");
    let mut bytes =
        br#"<?xml version="1.0" encoding="iso-8859-1"?><Root><LanguageName>Fran"#.to_vec();
    bytes.push(0xE7);
    bytes.extend_from_slice(b"ais</LanguageName></Root>");
    fs::write(&path, bytes).unwrap();

    assert!(TranslationTable::read_from(&path).is_err());

    let manager = manager_in(temp_dir.path());
    assert_eq!(manager.discover_languages().len(), 1);
    assert!(!manager.set_language_from_file(&path));
}
