//! Question loading: file formats, skipped lines and the fallback set.

use quiz_party::core::GameRng;
use quiz_party::questions::{parse_questions, QuestionId, QuestionKind, QuestionPool};

const BOARD_FILE: &str = "\
Apa kepanjangan CPU? | Central Processing Unit | Central Program Unit | Computer Personal Unit | Control Process Unit | A

Protokol web aman? | FTP | HTTPS | SMTP | Telnet | b
Baris rusak tanpa kunci | satu | dua
Port default HTTP? | 21 | 25 | 80 | 443 | 3
Kunci tidak valid | a | b | c | d | E
";

const MATCH_FILE: &str = "\
Ibu kota Indonesia? | Jakarta | Kota besar | Di pulau Jawa
hanya pertanyaan
Hewan berbelalai? | Gajah
";

#[test]
fn test_board_file_skips_bad_lines() {
    let pool = QuestionPool::from_text(QuestionKind::MultipleChoice, BOARD_FILE);
    assert!(pool.load_error().is_none());
    assert_eq!(pool.len(), 3);

    let ids: Vec<u32> = pool.ids().iter().map(|id| id.raw()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let https = pool.get_by_id(QuestionId::new(2)).unwrap();
    assert_eq!(https.correct_index(), Some(1));
    assert!(https.is_correct_option(1));
    let port = pool.get_by_id(QuestionId::new(3)).unwrap();
    assert_eq!(port.options()[port.correct_index().unwrap()], "80");
}

#[test]
fn test_match_file_with_clues() {
    let pool = QuestionPool::from_text(QuestionKind::FreeAnswer, MATCH_FILE);
    assert_eq!(pool.len(), 2);
    let first = pool.get_by_id(QuestionId::new(1)).unwrap();
    assert_eq!(first.answer(), Some("Jakarta"));
    assert_eq!(first.clues().len(), 2);
    let second = pool.get_by_id(QuestionId::new(2)).unwrap();
    assert_eq!(second.answer(), Some("Gajah"));
    assert!(second.clues().is_empty());
}

#[test]
fn test_no_valid_lines_uses_fallback() {
    assert!(parse_questions(QuestionKind::MultipleChoice, "rusak\n\n").is_err());

    let pool = QuestionPool::from_text(QuestionKind::MultipleChoice, "rusak\n\n");
    assert!(pool.load_error().is_some());
    assert!(pool.len() >= 2);
    assert_eq!(pool.kind(), QuestionKind::MultipleChoice);
}

#[test]
fn test_missing_file_uses_fallback() {
    let path = std::env::temp_dir().join("quiz-party-no-such-file.txt");
    let pool = QuestionPool::load_file(QuestionKind::FreeAnswer, &path);
    assert!(pool.load_error().is_some());
    assert!(pool.len() >= 2);
    assert!(pool.questions().iter().all(|q| q.answer().is_some()));
}

#[test]
fn test_file_on_disk_loads() {
    let path = std::env::temp_dir().join(format!("quiz-party-questions-{}.txt", std::process::id()));
    std::fs::write(&path, BOARD_FILE).unwrap();
    let pool = QuestionPool::load_file(QuestionKind::MultipleChoice, &path);
    assert_eq!(pool.len(), 3);
    assert!(pool.load_error().is_none());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_lookup_and_random_draw() {
    let pool = QuestionPool::from_text(QuestionKind::MultipleChoice, BOARD_FILE);
    let unknown = pool.get_by_id(QuestionId::new(99)).unwrap();
    assert_eq!(unknown.id, QuestionId::new(1));

    let mut rng = GameRng::new(5);
    for _ in 0..20 {
        let q = pool.get_random(&mut rng).unwrap();
        assert!(pool.contains(q.id));
    }

    let empty = QuestionPool::from_questions(QuestionKind::MultipleChoice, Vec::new());
    assert!(empty.get_random(&mut rng).is_none());
    assert!(empty.get_by_id(QuestionId::new(1)).is_none());
}
