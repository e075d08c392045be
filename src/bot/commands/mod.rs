use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Movie catalog bot commands:")]
pub enum Command {
    #[command(description = "Open the main menu")]
    Start,
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Open the admin panel")]
    Admin,
    #[command(description = "Cancel the pending admin action")]
    Cancel,
}
