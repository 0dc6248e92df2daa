use monthly_rollup::*;

const ORG: &str = r#"[
    {"name": "Company", "path": ["Company"]},
    {"name": "Region A", "path": ["Company", "Region A"]},
    {"name": "Team 1", "path": ["Company", "Region A", "Team 1"], "Jan": 50, "Feb": 40},
    {"name": "Team 2", "path": ["Company", "Region A", "Team 2"], "Jan": 30},
    {"name": "Team 3", "path": ["Company", "Region B", "Team 3"], "Mar": 25}
]"#;

fn main() {
    println!("🌳 Tree Grid Demo\n");

    // Region B has no record of its own; let the loader create the group.
    let config = RollupConfig::default().with_synthesized_ancestors();
    let mut store = match load_tree_from_json(ORG, &config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            return;
        }
    };

    println!("📋 Loaded hierarchy:\n{}", store.to_markdown());

    let edit = EditRequest::new("Team 1", "Jan", 80.0);
    println!("✏️  Team 1 / Jan <- 80");
    match store.apply_edit(&edit) {
        Ok(chain) => {
            for node in chain {
                println!(
                    "   {:<10} Jan {:>8.2}  total {:>8.2}",
                    node.name(),
                    node.value(Period::Jan),
                    node.total()
                );
            }
        }
        Err(e) => println!("   ❌ rejected: {}", e),
    }

    println!("\n✏️  Region A / Jan <- 1");
    if let Err(e) = store.apply_edit(&EditRequest::new("Region A", "Jan", 1.0)) {
        println!("   ❌ rejected: {}", e);
    }

    println!("\n✅ Verification:");
    let violations = store.verify(1e-9);
    println!("  Roll-ups consistent: {}", violations.is_empty());

    println!("\n🔎 Search 'team 3':");
    for id in search_tree(&store, "team 3") {
        let node = store.node(id);
        println!("  {}{}", "  ".repeat(store.index().depth(id)), node.name());
    }
}
