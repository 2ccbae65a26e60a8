//! `olla tools`: Show the tool catalog advertised to the model.

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = olla_tools::default_registry()?;

    println!("  Built-in tools:");
    for tool in registry.describe_all() {
        println!("    - {tool}");
    }
    println!();
    println!("  The model calls a tool by replying with:");
    println!("    {{\"tool\":\"tool_name\",\"parameters\":{{\"param1\":\"value1\"}}}}");

    Ok(())
}
