use monthly_rollup::*;

const PEOPLE: &str = r#"[
    {"name": "Alice", "Jan": 100, "Feb": 100, "Mar": 100, "Apr": 100, "May": 100, "Jun": 100,
     "Jul": 100, "Aug": 100, "Sep": 100, "Oct": 100, "Nov": 100, "Dec": 100},
    {"name": "Bob", "Jan": 80, "Feb": "95", "Mar": null, "Jun": 120},
    {"name": "Carol", "Dec": 1000}
]"#;

fn main() {
    println!("📊 Flat Grid Demo\n");

    let mut table = match load_flat_from_json(PEOPLE, &RollupConfig::default()) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            return;
        }
    };

    println!("📋 Loaded rows:\n");
    println!("{}", table.to_markdown());

    let edits = [
        EditRequest::new("Alice", "Mar", 400.0),
        EditRequest::new("Alice", "total", 2405.0),
        EditRequest::new("Bob", "average", "50"),
        EditRequest::new("Carol", "name", "Caroline"),
    ];

    for edit in &edits {
        println!("✏️  {} / {} <- {:?}", edit.target, edit.field, edit.new_value);
        match table.apply_edit(edit) {
            Ok(row) => println!(
                "   ✅ total {:.2}, average {:.2}, Jan {:.2}",
                row.total(),
                row.average,
                row.record.value(Period::Jan)
            ),
            Err(e) => println!("   ❌ rejected: {}", e),
        }
    }

    println!("\n🔎 Search 'al':");
    for row in search_rows(&table, "al") {
        println!("  {}: {:.2}", row.name(), row.total());
    }

    if let Ok(q1) = PeriodRange::parse("2024-01:2024-03") {
        println!("\n📅 Q1 totals:");
        for entry in range_totals(&table, q1) {
            println!("  {}: {:.2}", entry.name, entry.total);
        }
    }

    println!("\n📄 CSV:\n{}", table.to_csv());
}
