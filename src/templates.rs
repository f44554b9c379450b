//! HTML for the polls pages.
//!
//! Each page has a context struct holding exactly what it shows. All text coming from the
//! store goes through [`escape`] before it reaches the markup.

use crate::db::models::{Choice, Question};
use crate::routes;
use axum::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexContext {
    pub latest_question_list: Vec<Question>,
}

#[derive(Debug, Clone, Copy)]
pub struct DetailContext<'a> {
    pub question: &'a Question,
    pub choices: &'a [Choice],
    pub error_message: Option<&'a str>,
}

#[derive(Debug, Clone, Copy)]
pub struct ResultsContext<'a> {
    pub question: &'a Question,
    pub choices: &'a [Choice],
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn pluralize_votes(votes: i32) -> String {
    if votes == 1 {
        "1 vote".to_string()
    } else {
        format!("{votes} votes")
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

pub fn index(ctx: &IndexContext) -> String {
    let mut body = String::new();
    if ctx.latest_question_list.is_empty() {
        body.push_str("<p>No polls are available.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for question in &ctx.latest_question_list {
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                routes::detail_url(question.id),
                escape(&question.question_text)
            ));
        }
        body.push_str("</ul>\n");
    }
    layout("Polls", &body)
}

pub fn detail(ctx: &DetailContext<'_>) -> String {
    let question = ctx.question;
    let mut body = String::new();

    body.push_str(&format!(
        "<form action=\"{}\" method=\"post\">\n<fieldset>\n<legend><h1>{}</h1></legend>\n",
        routes::vote_url(question.id),
        escape(&question.question_text)
    ));
    if let Some(message) = ctx.error_message {
        body.push_str(&format!("<p><strong>{}</strong></p>\n", escape(message)));
    }
    for (counter, choice) in ctx.choices.iter().enumerate() {
        body.push_str(&format!(
            "<input type=\"radio\" name=\"choice\" id=\"choice{n}\" value=\"{id}\">\n\
             <label for=\"choice{n}\">{text}</label><br>\n",
            n = counter + 1,
            id = choice.id,
            text = escape(&choice.choice_text)
        ));
    }
    body.push_str("</fieldset>\n<input type=\"submit\" value=\"Vote\">\n</form>\n");

    layout(&question.question_text, &body)
}

pub fn results(ctx: &ResultsContext<'_>) -> String {
    let question = ctx.question;
    let mut body = format!("<h1>{}</h1>\n<ul>\n", escape(&question.question_text));

    for choice in ctx.choices {
        body.push_str(&format!(
            "<li>{} -- {}</li>\n",
            escape(&choice.choice_text),
            pluralize_votes(choice.votes)
        ));
    }
    body.push_str(&format!(
        "</ul>\n<a href=\"{}\">Vote again?</a>\n",
        routes::detail_url(question.id)
    ));

    layout(&question.question_text, &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<a href=\"{}\">Back to polls</a>\n",
        escape(title),
        escape(message),
        routes::index_url()
    );
    layout(title, &body)
}
