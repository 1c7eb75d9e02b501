use minijinja::{Environment, context};

use super::AppState;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

pub(super) const TITLE: &str = "OpenAI Chat Tester";

pub(super) fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("index.html", INDEX_TEMPLATE)?;
    Ok(env)
}

pub(super) fn render_index(state: &AppState) -> Result<String, minijinja::Error> {
    state.templates.get_template("index.html")?.render(context! {
        title => TITLE,
        model => state.model_name(),
        key_notice => state.key_notice.as_ref(),
    })
}
