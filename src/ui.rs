// UI layer: renders the compose form with `dialoguer` prompts and runs the
// submit action. The functions are small and synchronous to make the flow
// easy to follow; every network call sits behind a spinner.

use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::api::{self, MediaClient, PostedTweet, TwitterClient};
use crate::creds::{CredentialSource, Credentials};
use crate::error::{PostError, PostResult};
use crate::form::{char_count, char_counter, Draft, FormState, IMAGE_EXTENSIONS, MAX_TWEET_CHARS};

/// Run the interactive form until a tweet is posted or the user quits.
///
/// After a successful post the session stays "posted" for good: the loop
/// prints the restart note and ends. After a failure the loop re-renders
/// with the draft retained so the user can correct and resubmit.
pub fn run(mut state: FormState) -> Result<()> {
    println!("{}", "🚀 Twitter Post App".bold());
    println!("Post tweets directly to your Twitter account\n");

    loop {
        let source = prompt_credentials()?;
        compose(&mut state.draft)?;

        if !Confirm::new()
            .with_prompt("Post Tweet")
            .default(true)
            .interact()?
        {
            if Confirm::new()
                .with_prompt("Quit without posting?")
                .default(false)
                .interact()?
            {
                return Ok(());
            }
            continue;
        }

        match submit(&source, &state.draft) {
            Ok(posted) => {
                state.mark_posted();
                render_success(&posted);
            }
            Err(err) => render_error(&err),
        }

        if state.posted() {
            println!();
            println!("{}", "Restart the app to post another tweet".cyan());
            return Ok(());
        }
    }
}

/// Sidebar equivalent: either take the four values from the form (masked
/// input) or fall back to the environment at submit time.
fn prompt_credentials() -> Result<CredentialSource> {
    let use_custom = Confirm::new()
        .with_prompt("Use custom credentials?")
        .default(false)
        .interact()?;

    if !use_custom {
        return Ok(CredentialSource::Environment);
    }

    let consumer_key = masked("Consumer Key")?;
    let consumer_secret = masked("Consumer Secret")?;
    let access_token = masked("Access Token")?;
    let access_token_secret = masked("Access Token Secret")?;

    Ok(CredentialSource::UserSupplied(Credentials {
        consumer_key,
        consumer_secret,
        access_token,
        access_token_secret,
    }))
}

fn masked(prompt: &str) -> Result<String> {
    Ok(Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?)
}

/// Collect the tweet text and optional image into the draft. The previous
/// text is pre-filled so failed submissions keep their input.
fn compose(draft: &mut Draft) -> Result<()> {
    let text: String = Input::new()
        .with_prompt("Compose your tweet (What's happening?)")
        .with_initial_text(draft.text.clone())
        .allow_empty(true)
        .interact_text()?;
    println!("{}", char_counter(&text).dark_grey());
    if char_count(&text) > MAX_TWEET_CHARS {
        // Advisory only; submission is not blocked.
        println!(
            "{}",
            "Tweet is over 280 characters and may be rejected".yellow()
        );
    }
    draft.text = text;

    draft.include_media = Confirm::new()
        .with_prompt("Include media?")
        .default(draft.include_media)
        .interact()?;

    if draft.include_media {
        let picked = rfd::FileDialog::new()
            .set_title("Upload an image")
            .add_filter("image", IMAGE_EXTENSIONS)
            .pick_file();
        match &picked {
            Some(path) => println!("Selected: {}", path.display()),
            None => println!("No file selected"),
        }
        draft.image = picked;
    }

    Ok(())
}

/// One submit action: resolve credentials once, build the handles, publish.
fn submit(source: &CredentialSource, draft: &Draft) -> PostResult<PostedTweet> {
    let creds = source.resolve();

    let spinner = spinner("Posting...");
    let result = TwitterClient::new(&creds).and_then(|client| {
        let media = MediaClient::new(&creds)?;
        api::publish(&client, &media, draft)
    });
    spinner.finish_and_clear();
    result
}

fn render_success(posted: &PostedTweet) {
    println!("{}", "✅ Tweet posted successfully!".green());
    println!("🎈 🎈 🎈");
    println!();
    println!("{}", "Posted Tweet Details".bold());
    println!("  Tweet ID: {}", posted.id);
    println!("  Text: {}", posted.text);
}

fn render_error(err: &PostError) {
    // The error Display strings carry the user-facing prefixes.
    println!("{}", err.to_string().red());
}

fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
