//! # Cascade Benchmarks
//!
//! Performance benchmarks for chipflow-core engine runs.
//!
//! Run with: `cargo bench -p chipflow-core`

use chipflow_core::{BotId, Destination, Engine, Instruction, OutputId};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// A chain where bot n sends low to output n and high to bot n + 1.
/// The final seed into bot 0 cascades through every bot.
fn chain(size: u32) -> Vec<Instruction> {
    let mut instructions = Vec::with_capacity(size as usize * 2 + 1);
    for n in 0..size {
        instructions.push(Instruction::route(
            n,
            Destination::Output(OutputId(n)),
            Destination::Bot(BotId(n + 1)),
        ));
        instructions.push(Instruction::seed(n, n));
    }
    instructions.push(Instruction::seed(u32::MAX, 0));
    instructions
}

/// A complete binary tree of bots; leaves are seeded, the root sends to outputs.
/// Seeds come first so the whole tree resolves when the rules arrive.
fn tree(depth: u32) -> Vec<Instruction> {
    let bots = (1u32 << depth) - 1;
    let first_leaf = bots / 2;
    let mut instructions = Vec::new();
    let mut chip = 0u32;

    for leaf in first_leaf..bots {
        for _ in 0..2 {
            instructions.push(Instruction::seed(chip, leaf));
            chip += 1;
        }
    }
    for bot in (0..bots).rev() {
        let parent = if bot == 0 {
            None
        } else {
            Some(BotId((bot - 1) / 2))
        };
        let up = parent.map_or(Destination::Output(OutputId(0)), Destination::Bot);
        instructions.push(Instruction::route(
            bot,
            Destination::Output(OutputId(bot + 1)),
            up,
        ));
    }
    instructions
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_cascade");

    for size in [100u32, 1000, 10000] {
        let instructions = chain(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &instructions, |b, ins| {
            b.iter(|| black_box(Engine::run(ins.iter().copied())))
        });
    }

    group.finish();
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_resolution");

    for depth in [6u32, 10, 14] {
        let instructions = tree(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &instructions, |b, ins| {
            b.iter(|| black_box(Engine::run(ins.iter().copied())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_chain, bench_tree);
criterion_main!(benches);
