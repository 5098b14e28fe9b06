//! Performance benchmarks for the rules engine and the letter supply

use rand::rngs::StdRng;
use rand::SeedableRng;
use server::supply::{fresh_pool, LetterSupply};
use shared::{extract_words, score_move, Board, Index, Letter, Placement, Position, WordList};
use std::time::Instant;

fn at(x: usize, y: usize) -> Index {
    Position::new(x, y).unwrap().to_index()
}

fn placement(tiles: &[(usize, usize, char)]) -> Placement {
    tiles
        .iter()
        .map(|&(x, y, c)| (at(x, y), Letter::new(c).unwrap()))
        .collect()
}

/// Board with a few crossing words around the center
fn busy_board() -> Board {
    let mut board = Board::new();
    board
        .commit(&placement(&[
            (3, 7, 'W'),
            (4, 7, 'O'),
            (5, 7, 'R'),
            (6, 7, 'D'),
            (7, 7, 'S'),
        ]))
        .unwrap();
    board
        .commit(&placement(&[(7, 3, 'C'), (7, 4, 'A'), (7, 5, 'S'), (7, 6, 'E')]))
        .unwrap();
    board
        .commit(&placement(&[(4, 8, 'N'), (4, 9, 'E')]))
        .unwrap();
    board
}

fn dictionary() -> WordList {
    let mut words: Vec<String> = (0..20_000).map(|i| format!("W{:05}", i)).collect();
    words.extend(["WORDS", "CASES", "ONE", "CASE", "SO", "ES", "AT", "EAT"].map(String::from));
    WordList::from_words(words)
}

/// Benchmarks full validation and scoring of a move with cross words
#[test]
fn benchmark_score_move() {
    let board = busy_board();
    let dictionary = dictionary();
    // S beside the E of CASE forms ES
    let candidate = placement(&[(8, 6, 'S')]);

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let _ = score_move(&board, &candidate, &dictionary);
    }

    let duration = start.elapsed();
    println!(
        "Move scoring: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 5000);
}

/// Benchmarks word extraction alone
#[test]
fn benchmark_extract_words() {
    let board = busy_board();
    let candidate = placement(&[(5, 8, 'A'), (5, 9, 'T')]);

    let iterations = 50_000;
    let start = Instant::now();

    let mut formed = 0;
    for _ in 0..iterations {
        formed += extract_words(&board, &candidate).len();
    }

    let duration = start.elapsed();
    println!(
        "Word extraction: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert!(formed >= iterations);
    assert!(duration.as_millis() < 5000);
}

/// Benchmarks dictionary lookups against a large word list
#[test]
fn benchmark_dictionary_lookup() {
    let dictionary = dictionary();
    let probes = ["WORDS", "W12345", "ZZZZZ", "CASE", "NOPE"];

    let iterations = 100_000;
    let start = Instant::now();

    let mut hits = 0;
    for i in 0..iterations {
        if shared::Dictionary::is_word(&dictionary, probes[i % probes.len()]) {
            hits += 1;
        }
    }

    let duration = start.elapsed();
    println!(
        "Dictionary lookup: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert_eq!(hits, iterations / probes.len() * 3);
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks supply draws including refills
#[test]
fn benchmark_supply_draws() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut supply = LetterSupply::fresh(&mut rng);

    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        let drawn = supply.draw(i % 8, &mut rng);
        assert!(drawn.len() <= 7);
    }

    let duration = start.elapsed();
    println!(
        "Supply draws: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 5000);
}

/// Benchmarks building shuffled tile sets
#[test]
fn benchmark_fresh_pool() {
    let mut rng = StdRng::seed_from_u64(2);

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let pool = fresh_pool(&mut rng);
        assert_eq!(pool.len(), 98);
    }

    let duration = start.elapsed();
    println!(
        "Pool shuffles: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 5000);
}
