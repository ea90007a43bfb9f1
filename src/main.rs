//! Goban-Sync demo binary.
//!
//! ## Usage
//!
//! - `goban-sync` - Show the rules-engine demo
//! - `goban-sync demo` - Same as above
//! - `goban-sync converge` - Simulate two replicas converging over the wire

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use goban_sync::board::{Board, Sign};
use goban_sync::coord::str_coord;
use goban_sync::replica::ReplicatedBoard;
use goban_sync::wire::{decode_operations, encode_operations};

/// Goban-Sync: a replicated Go board core
#[derive(Parser)]
#[command(name = "goban-sync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a short scripted sequence through the rules engine
    Demo,
    /// Simulate two replicas exchanging concurrent edits
    Converge,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Converge) => run_converge(),
        Some(Commands::Demo) | None => {
            run_demo();
            Ok(())
        }
    }
}

fn run_demo() {
    println!("=== Rules Engine Demo (5x5) ===");

    // Black surrounds the white stone at (1, 1) and captures it.
    let moves = [
        (Sign::White, (1, 1)),
        (Sign::Black, (0, 1)),
        (Sign::Black, (2, 1)),
        (Sign::Black, (1, 0)),
        (Sign::Black, (1, 2)),
    ];

    let mut board = Board::new(5, 5);
    for (sign, vertex) in moves {
        let coord = str_coord(vertex, 5, 5).unwrap_or_else(|| "??".into());
        println!("{:?} plays {coord}", sign);
        board = board.apply_move(sign, vertex);
    }

    println!("{board}");
    let [black, white] = board.captures();
    println!("Captures: black {black}, white {white}");
}

fn run_converge() -> Result<()> {
    println!("=== Convergence Demo ===");

    let mut alice = ReplicatedBoard::new();
    let mut bob = ReplicatedBoard::new();
    println!("alice = {}", alice.replica_id());
    println!("bob   = {}", bob.replica_id());

    // Concurrent edits: neither replica has seen the other's operation.
    let from_alice = vec![alice.set((2, 2), Sign::Black), alice.set((3, 2), Sign::Black)];
    let from_bob = vec![bob.set((2, 2), Sign::White)];

    // Broadcast both batches over the wire, in opposite directions.
    let alice_payload = encode_operations(&from_alice)?;
    let bob_payload = encode_operations(&from_bob)?;
    println!("alice -> bob: {alice_payload}");
    println!("bob -> alice: {bob_payload}");

    bob.merge(decode_operations(&alice_payload)?);
    alice.merge(decode_operations(&bob_payload)?);

    // Duplicate delivery is harmless.
    bob.merge(decode_operations(&alice_payload)?);

    println!("\nalice renders:\n{}", grid_to_string(&alice.render(5, 5)));
    println!("bob renders:\n{}", grid_to_string(&bob.render(5, 5)));
    assert_eq!(alice.render(5, 5), bob.render(5, 5));
    println!("replicas converged");
    Ok(())
}

fn grid_to_string(grid: &[Vec<Sign>]) -> String {
    let mut out = String::new();
    for row in grid {
        for &sign in row {
            out.push(match sign {
                Sign::Black => 'X',
                Sign::White => 'O',
                Sign::Empty => '.',
            });
            out.push(' ');
        }
        out.push('\n');
    }
    out
}
