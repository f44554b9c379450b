//! Named routes of the polls pages and their reverse lookup.

use uuid::Uuid;

pub const INDEX: &str = "/polls/";
pub const DETAIL: &str = "/polls/:question_id/";
pub const VOTE: &str = "/polls/:question_id/vote/";
pub const RESULTS: &str = "/polls/:question_id/results/";

pub const ADMIN_QUESTIONS: &str = "/admin/questions";
pub const ADMIN_QUESTION: &str = "/admin/questions/:question_id";

pub fn index_url() -> String {
    INDEX.to_string()
}

pub fn detail_url(question_id: Uuid) -> String {
    format!("/polls/{question_id}/")
}

pub fn vote_url(question_id: Uuid) -> String {
    format!("/polls/{question_id}/vote/")
}

pub fn results_url(question_id: Uuid) -> String {
    format!("/polls/{question_id}/results/")
}

pub fn admin_question_url(question_id: Uuid) -> String {
    format!("/admin/questions/{question_id}")
}
