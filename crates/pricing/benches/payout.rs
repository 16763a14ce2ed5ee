use chrono::Utc;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use lootledger_core::{Money, Percent, RankId};
use lootledger_pricing::{PayoutInputs, PricingLine, price_lines};
use lootledger_roster::{Member, MemberDraft, Rank, RankDraft};

fn line_set(n: usize) -> Vec<PricingLine> {
    (0..n)
        .map(|i| PricingLine {
            name: format!("item-{i}"),
            quantity: (i % 7 + 1) as u32,
            inputs: PayoutInputs {
                base_value: Money::new(1_000 + (i as u64) * 137),
                payable: i % 5 != 0,
                pct_override: if i % 3 == 0 {
                    Some(Percent::new(0.5).unwrap())
                } else {
                    None
                },
            },
        })
        .collect()
}

fn bench_price_lines(c: &mut Criterion) {
    let member = Member::create(
        MemberDraft {
            name: "Vex".to_string(),
            rank: Some(RankId::new("Enforcer").unwrap()),
            bonus_tier: true,
            discord_id: None,
            avatar_url: None,
        },
        Utc::now(),
    )
    .unwrap();
    let rank = Rank::new(
        RankId::new("Enforcer").unwrap(),
        RankDraft {
            level: 3,
            base_pct: Percent::new(0.35).unwrap(),
            bonus_pct: Some(Percent::new(0.45).unwrap()),
            color: None,
        },
    );

    let lines = line_set(32);
    c.bench_function("price_lines/32", |b| {
        b.iter(|| price_lines(black_box(&lines), black_box(&member), Some(black_box(&rank))))
    });
}

criterion_group!(benches, bench_price_lines);
criterion_main!(benches);
