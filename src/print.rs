//! Console tables for ratings, load reports, markets and scoregrids.

use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Cell, Col, Row, Table};

use crate::expectation::FixtureExpectation;
use crate::market::{Markets, PricedOutcome};
use crate::scoregrid::Scoregrid;
use crate::table::{LoadStatus, RatingTable};

fn left(min_width: usize) -> Col {
    Col::new(Styles::default().with(MinWidth(min_width)).with(HAlign::Left))
}

fn right(min_width: usize) -> Col {
    Col::new(Styles::default().with(MinWidth(min_width)).with(HAlign::Right))
}

fn header_row(cells: &[&str]) -> Row {
    Row::new(
        Styles::default().with(Header(true)),
        cells.iter().map(|&cell| cell.into()).collect(),
    )
}

pub fn tabulate_ratings(table: &RatingTable) -> Table {
    let mut tabulated = Table::default()
        .with_cols(vec![
            left(20),
            right(8),
            right(8),
            left(11),
            right(6),
            left(8),
        ])
        .with_row(header_row(&[
            "Team",
            "Attack",
            "Defense",
            "Competition",
            "Games",
            "Reliable",
        ]));
    for rating in table.sorted() {
        tabulated.push_row(Row::new(
            Styles::default(),
            vec![
                rating.team.to_string().into(),
                format!("{:.4}", rating.attack).into(),
                format!("{:.4}", rating.defense).into(),
                rating.competition.to_string().into(),
                rating.sample_size.to_string().into(),
                if rating.reliable { "yes" } else { "no" }.into(),
            ],
        ));
    }
    tabulated
}

pub fn tabulate_reports(table: &RatingTable) -> Table {
    let mut tabulated = Table::default()
        .with_cols(vec![left(11), left(10), left(30)])
        .with_row(header_row(&["Competition", "Status", "Detail"]));
    for report in table.reports() {
        let (status, detail) = match &report.status {
            LoadStatus::Loaded { teams } => ("loaded", format!("{teams} teams")),
            LoadStatus::Failed(reason) => ("failed", reason.clone()),
        };
        tabulated.push_row(Row::new(
            Styles::default(),
            vec![
                report.competition.to_string().into(),
                status.into(),
                detail.into(),
            ],
        ));
    }
    tabulated
}

pub fn tabulate_expectation(home: &str, away: &str, expectation: &FixtureExpectation) -> Table {
    Table::default()
        .with_cols(vec![left(20), right(8)])
        .with_row(header_row(&["Side", "λ"]))
        .with_row(Row::new(
            Styles::default(),
            vec![
                home.into(),
                format!("{:.4}", expectation.home_lambda()).into(),
            ],
        ))
        .with_row(Row::new(
            Styles::default(),
            vec![
                away.into(),
                format!("{:.4}", expectation.away_lambda()).into(),
            ],
        ))
}

pub fn tabulate_markets(markets: &Markets) -> Table {
    let mut tabulated = Table::default()
        .with_cols(vec![left(16), right(10), right(10)])
        .with_row(header_row(&["Outcome", "Probability", "Fair price"]));
    push_section(
        &mut tabulated,
        [&markets.home_win, &markets.draw, &markets.away_win],
        false,
    );
    push_section(
        &mut tabulated,
        markets.goals.iter().flat_map(|goals| [&goals.over, &goals.under]),
        true,
    );
    push_section(
        &mut tabulated,
        [&markets.both_score, &markets.not_both_score],
        true,
    );
    push_section(&mut tabulated, &markets.correct_scores, true);
    tabulated
}

fn push_section<'a>(
    tabulated: &mut Table,
    outcomes: impl IntoIterator<Item = &'a PricedOutcome>,
    separated: bool,
) {
    for (index, priced) in outcomes.into_iter().enumerate() {
        let styles = if separated && index == 0 {
            Styles::default().with(Separator(true))
        } else {
            Styles::default()
        };
        tabulated.push_row(Row::new(
            styles,
            vec![
                priced.outcome.to_string().into(),
                format!("{:.6}", priced.prob).into(),
                priced.price.to_string().into(),
            ],
        ));
    }
}

pub fn tabulate_scoregrid(scoregrid: &Scoregrid) -> Table {
    let cap = scoregrid.cap();
    let mut cols = vec![Col::new(
        Styles::default()
            .with(Separator(true))
            .with(MinWidth(5))
            .with(HAlign::Centred),
    )];
    cols.extend((0..cap).map(|_| right(7)));

    let mut header_cells: Vec<Cell> = vec!["H \\ A".into()];
    header_cells.extend((0..cap).map(|away_goals| away_goals.to_string().into()));
    let mut tabulated = Table::default().with_cols(cols).with_row(Row::new(
        Styles::default().with(Header(true)).with(Separator(true)),
        header_cells,
    ));

    for home_goals in 0..cap {
        let mut row_cells: Vec<Cell> = vec![home_goals.to_string().into()];
        row_cells.extend(
            scoregrid
                .row_slice(home_goals)
                .iter()
                .map(|prob| format!("{prob:.4}").into()),
        );
        tabulated.push_row(Row::new(Styles::default(), row_cells));
    }
    tabulated
}
