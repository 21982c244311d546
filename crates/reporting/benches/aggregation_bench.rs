//! Benchmarks for the dashboard aggregation pass.
//! Run with: cargo bench -p pulse-reporting

use chrono::{DateTime, Duration, Utc};
use pulse_core::range::DateRangePreset;
use pulse_core::types::{Dataset, EngagementRecord, Member, MemberStatus, Purchase};
use pulse_reporting::{build_dashboard, DashboardSettings};

fn create_dataset(now: DateTime<Utc>, members: usize) -> Dataset {
    let statuses = [MemberStatus::Active, MemberStatus::Churned, MemberStatus::Paused];
    let mut data = Dataset::default();

    for i in 0..members {
        let joined_at = now - Duration::hours((i * 7 % 8_760) as i64);
        data.members.push(Member {
            id: format!("member-{i:06}"),
            company_id: "bench".to_string(),
            email: None,
            name: None,
            joined_at,
            status: statuses[i % 3],
            lifetime_value: ((i % 500) as f64).into(),
            updated_at: Some(joined_at + Duration::days(15)),
        });
    }

    for i in 0..members * 4 {
        data.purchases.push(Purchase {
            id: format!("purchase-{i:07}"),
            company_id: "bench".to_string(),
            member_id: format!("member-{:06}", i % members),
            product_id: format!("product-{}", i % 40),
            product_name: format!("Product {}", i % 40),
            amount: ((i % 200) as f64 + 0.99).into(),
            currency: "USD".to_string(),
            purchased_at: now - Duration::minutes((i * 13 % 525_600) as i64),
        });
    }

    for i in 0..members * 2 {
        data.engagement.push(EngagementRecord {
            member_id: format!("member-{:06}", i % members),
            company_id: "bench".to_string(),
            date: (now - Duration::days((i % 365) as i64)).date_naive(),
            messages_sent: (i % 9) as u32,
            messages_received: (i % 5) as u32,
            interactions: (i % 3) as u32,
        });
    }

    data
}

fn main() {
    let now = Utc::now();
    let data = create_dataset(now, 10_000);
    let range = DateRangePreset::NinetyDays.resolve(now, 10);
    let settings = DashboardSettings::default();

    // Warmup
    for _ in 0..3 {
        build_dashboard("bench", &data, &range, now, &settings);
    }

    // Benchmark
    let iterations = 50;
    let start = std::time::Instant::now();

    for _ in 0..iterations {
        let _ = build_dashboard("bench", &data, &range, now, &settings);
    }

    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations;

    println!("=== Dashboard Aggregation Benchmark ===");
    println!("Iterations:  {}", iterations);
    println!("Total time:  {:?}", elapsed);
    println!("Per call:    {:?}", per_iter);
    println!("Members:     {}", data.members.len());
    println!("Purchases:   {}", data.purchases.len());
    println!("Engagement:  {}", data.engagement.len());
}
