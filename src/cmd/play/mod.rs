// Copyright 2026 the cardbattle authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod get;
mod post;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::fs::write;
    use std::time::Duration;

    use portpicker::pick_unused_port;
    use reqwest::StatusCode;
    use tempfile::tempdir;
    use tokio::spawn;
    use tokio::task::JoinHandle;
    use tokio::time::sleep;

    use crate::cmd::play::server::ServerConfig;
    use crate::cmd::play::server::start_server;
    use crate::deck::parse_deck;
    use crate::error::Fallible;
    use crate::utils::wait_for_server;

    const TEST_HOST: &str = "127.0.0.1";

    const TEST_DECK: &str = r#"[
        {"question": "What is 2 + 2?", "category": "Math", "id": 1},
        {"question": "What is 3 * 3?", "category": "Math", "id": 2}
    ]"#;

    async fn spawn_server(
        deck: Option<&str>,
    ) -> Fallible<(u16, JoinHandle<Fallible<()>>, Option<tempfile::TempDir>)> {
        let port = pick_unused_port().unwrap();
        let (deck_path, dir) = match deck {
            Some(contents) => {
                let dir = tempdir()?;
                let path = dir.path().join("deck.json");
                write(&path, contents)?;
                (Some(path.display().to_string()), Some(dir))
            }
            None => (None, None),
        };
        let config = ServerConfig {
            deck_path,
            host: TEST_HOST.to_string(),
            port,
        };
        let handle = spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;
        Ok((port, handle, dir))
    }

    async fn post_action(port: u16, fields: &[(&str, &str)]) -> Fallible<String> {
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(fields)
            .send()
            .await?;
        assert!(response.status().is_success());
        Ok(response.text().await?)
    }

    #[tokio::test]
    async fn test_start_server_on_missing_deck_file() -> Fallible<()> {
        let config = ServerConfig {
            deck_path: Some("./derpherp.json".to_string()),
            host: TEST_HOST.to_string(),
            port: pick_unused_port().unwrap(),
        };
        let result = start_server(config).await;
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: cannot read deck file: ./derpherp.json");
        Ok(())
    }

    #[tokio::test]
    async fn test_start_server_on_malformed_deck_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("deck.json");
        write(&path, "this is not json")?;
        let config = ServerConfig {
            deck_path: Some(path.display().to_string()),
            host: TEST_HOST.to_string(),
            port: pick_unused_port().unwrap(),
        };
        assert!(start_server(config).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_start_server_on_empty_deck_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("deck.json");
        write(&path, "[]")?;
        let config = ServerConfig {
            deck_path: Some(path.display().to_string()),
            host: TEST_HOST.to_string(),
            port: pick_unused_port().unwrap(),
        };
        let result = start_server(config).await;
        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains("no cards"));
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e() -> Fallible<()> {
        let (port, handle, _dir) = spawn_server(Some(TEST_DECK)).await?;

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // Hit the `script.js` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/script.js")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );

        // Hit the not found endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Hit the export endpoint: the body round-trips the imported deck.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/deck.json")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let exported = parse_deck(&response.text().await?)?;
        assert_eq!(exported, parse_deck(TEST_DECK)?);

        // The root shows the game screen, no card drawn yet.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html = response.text().await?;
        assert!(html.contains("1 / 2"));
        assert!(html.contains("Draw a card"));

        // Draw: the card face appears.
        let html = post_action(port, &[("action", "Draw")]).await?;
        assert!(html.contains("Math"));
        assert!(html.contains("What is"));

        // Swipe right: the pile mutation is visible immediately.
        let html = post_action(port, &[("action", "Release"), ("dx", "150"), ("dy", "8")]).await?;
        assert!(html.contains("Known: 1"));
        assert!(html.contains("Draw a card"));

        // Second card: swipe left, exhausting the deck.
        post_action(port, &[("action", "Draw")]).await?;
        let html =
            post_action(port, &[("action", "Release"), ("dx", "-150"), ("dy", "0")]).await?;
        assert!(html.contains("Repeat: 1"));

        // Results only appear after the deferred transition fires.
        sleep(Duration::from_millis(900)).await;
        let html = reqwest::get(format!("http://{TEST_HOST}:{port}/"))
            .await?
            .text()
            .await?;
        assert!(html.contains("Session complete"));
        assert!(html.contains("50%"));
        assert!(html.contains("Repeat mistakes (1)"));
        assert!(html.contains("Needs attention"));

        // Repeat the mistakes: a fresh one-card session.
        let html = post_action(port, &[("action", "RepeatErrors")]).await?;
        assert!(html.contains("1 / 1"));
        assert!(html.contains("Known: 0"));

        // Abandon it, back to the start screen.
        let html = post_action(port, &[("action", "Finish")]).await?;
        assert!(html.contains("Create a deck"));

        // Quit shuts the server down cleanly.
        post_action(port, &[("action", "Quit")]).await?;
        handle.await.unwrap()?;
        Ok(())
    }

    #[tokio::test]
    async fn test_release_below_threshold_keeps_the_card() -> Fallible<()> {
        let (port, _handle, _dir) = spawn_server(Some(TEST_DECK)).await?;
        post_action(port, &[("action", "Draw")]).await?;
        let html = post_action(port, &[("action", "Release"), ("dx", "100"), ("dy", "0")]).await?;
        // Exactly at the threshold: no commit, same card stays current.
        assert!(html.contains("What is"));
        assert!(html.contains("Known: 0"));
        assert!(html.contains("Repeat: 0"));
        Ok(())
    }

    #[tokio::test]
    async fn test_editor_flow() -> Fallible<()> {
        let (port, _handle, _dir) = spawn_server(None).await?;

        // No deck imported: the start screen.
        let html = reqwest::get(format!("http://{TEST_HOST}:{port}/"))
            .await?
            .text()
            .await?;
        assert!(html.contains("Create a deck"));

        // Into the editor.
        let html = post_action(port, &[("action", "NewDeck")]).await?;
        assert!(html.contains("Deck editor"));

        // Add a card.
        let html = post_action(
            port,
            &[
                ("action", "AddCard"),
                ("question", "What is 2 + 2?"),
                ("category", "Math"),
            ],
        )
        .await?;
        assert!(html.contains("Deck (1)"));
        assert!(html.contains("What is 2 + 2?"));

        // A blank question is declined.
        let html = post_action(
            port,
            &[("action", "AddCard"), ("question", "  "), ("category", "Math")],
        )
        .await?;
        assert!(html.contains("Deck (1)"));

        // The export endpoint serves the workbench.
        let body = reqwest::get(format!("http://{TEST_HOST}:{port}/deck.json"))
            .await?
            .text()
            .await?;
        assert!(body.contains("What is 2 + 2?"));

        // Start studying the built deck.
        let html = post_action(port, &[("action", "Start")]).await?;
        assert!(html.contains("1 / 1"));
        assert!(html.contains("Draw a card"));
        Ok(())
    }
}
