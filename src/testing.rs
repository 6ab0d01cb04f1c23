//! Testing helpers.

use assert_float_eq::*;

use crate::domain::{CompetitionDataset, CompetitionId, MatchResult, TeamId};

pub fn assert_slice_f64_near(expected: &[f64], actual: &[f64], distance: u32) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_f64_near!(expected, actual, distance);
        }
    }
}

pub fn assert_slice_f64_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}

pub fn result(home_team: &str, away_team: &str, home_goals: u8, away_goals: u8) -> MatchResult {
    MatchResult {
        home_team: TeamId::from(home_team),
        away_team: TeamId::from(away_team),
        home_goals,
        away_goals,
    }
}

pub fn dataset(competition: &str, strength_weight: f64, matches: Vec<MatchResult>) -> CompetitionDataset {
    CompetitionDataset::new(CompetitionId::from(competition), strength_weight, matches).unwrap()
}

/// Header and rows in the football-data.co.uk layout, with a couple of irrelevant columns
/// interleaved.
pub fn csv_text(rows: &[(&str, &str, &str, &str)]) -> String {
    let mut text = String::from("Div,Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR\n");
    for (home, away, home_goals, away_goals) in rows {
        text.push_str(&format!("E0,10/08/2024,{home},{away},{home_goals},{away_goals},H\n"));
    }
    text
}

/// Answers a single HTTP request with `response` and returns the base URL to reach it on.
pub async fn serve_once(response: Vec<u8>) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = [0; 4096];
        let _ = stream.read(&mut request).await.unwrap();
        stream.write_all(&response).await.unwrap();
        stream.shutdown().await.unwrap();
    });
    format!("http://{addr}/")
}

/// A complete HTTP/1.1 response carrying `body`.
pub fn http_response(status: &str, body: &[u8]) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}
