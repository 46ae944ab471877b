use clap::Parser;
use tozemoon::contact::{ContactClient, ContactFields, FormSession, ToastKind};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Submit the contact form to a running endpoint"
)]
struct Cli {
    /// Submission endpoint
    #[arg(long, default_value = "http://127.0.0.1:8080/api/contact")]
    endpoint: String,

    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    message: String,

    /// CAPTCHA response token obtained from the widget
    #[arg(long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let fields = ContactFields::new(cli.name, cli.email, cli.message);

    let mut session = FormSession::new();
    if let Some(token) = cli.token {
        session.on_captcha_verified(token);
    }
    let Some(token) = session.begin_submit(&fields) else {
        let key = session.toast().map_or("toast.generic", |t| t.message.key());
        anyhow::bail!("{key}");
    };

    let client = ContactClient::new(reqwest::Client::builder().build()?, cli.endpoint);
    let result = client.submit(&fields, &token).await;
    session.finish_submit(result);

    match session.toast() {
        Some(toast) if toast.kind == ToastKind::Success => {
            println!("{}", toast.message.key());
            Ok(())
        }
        Some(toast) => anyhow::bail!("{}", toast.message.key()),
        None => anyhow::bail!("toast.generic"),
    }
}
