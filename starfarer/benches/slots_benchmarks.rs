use criterion::{Criterion, criterion_group, criterion_main};
use starfarer::{
    slots::{MachineConfig, PayTable, Reel, SeededSource, SlotMachine},
    wallet::{AccountId, WalletManager},
};
use std::sync::Arc;

/// Benchmark a single weighted reel draw
fn bench_reel_draw(c: &mut Criterion) {
    let reel = Reel::new(MachineConfig::default().symbols).unwrap();
    let source = SeededSource::new(1);

    c.bench_function("reel_draw_three", |b| {
        b.iter(|| reel.spin(&source));
    });
}

/// Benchmark draw classification
fn bench_evaluate(c: &mut Criterion) {
    let config = MachineConfig::default();
    let reel = Reel::new(config.symbols.clone()).unwrap();
    let table = PayTable::new(&reel, &config);

    c.bench_function("evaluate_draw", |b| {
        b.iter(|| table.evaluate([1, 1, 2]));
    });
}

/// Benchmark a full spin against an in-memory ledger
fn bench_spin_in_memory(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let wallet = Arc::new(rt.block_on(WalletManager::in_memory()).unwrap());
    let machine = SlotMachine::with_source(
        wallet.clone(),
        &MachineConfig::default(),
        Arc::new(SeededSource::new(7)),
    )
    .unwrap();
    let player = AccountId::from("bench");

    c.bench_function("spin_in_memory", |b| {
        b.iter(|| {
            rt.block_on(async {
                // Keep the account funded so every spin settles
                wallet.adjust_balance(&player, 1).await.unwrap();
                machine.spin(&player, 1).await.unwrap()
            })
        });
    });
}

criterion_group!(
    benches,
    bench_reel_draw,
    bench_evaluate,
    bench_spin_in_memory
);
criterion_main!(benches);
