use super::App;

pub fn run(app: &App, limit: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let mut board = app.service.leaderboard()?;
    if let Some(limit) = limit {
        board.truncate(limit);
    }
    println!("{}", serde_json::to_string_pretty(&board)?);
    Ok(())
}
