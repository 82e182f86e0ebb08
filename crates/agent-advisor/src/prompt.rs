//! Advisor prompt

use crate::Result;
use agent_prompt::JinjaTemplate;
use serde_json::json;

/// Advisory context every answer draws on
pub const FINANCIAL_CONTEXT: &str = "At interest rates so low, should I instead take a loan, finance the house and invest my capital in the stock market? So last but not least, I'm in my 30s and can now afford to buy a house full cash without taking any debt. However, with interest rates so low and they wrote this one a while back, but should I take a loan anyway and finance the house and invest my capital in the stock market? I think this is interesting that rates could change the story. Going from a 3% mortgage rate to a 5% that hurdle changes. So nine months ago, I would have said you'd be nuts to pay full cash now. Maybe it kind of makes sense, but first of all, who does this person for having that amount of money? I don't really live to be able to buy and cash, but that's great. But so Matt, you're thinking through this type of decision with a client. And this is the kind of thing where there really is no right or wrong answer, right? A lot of this is personality driven and depending on what the person wants to get";

const SYSTEM_PROMPT: &str = "Only answer the questions that is asked, please dont mention the context. Answer the following question using the context below if it is out of context, just provide related answer from the context don't mention that the question is out of context, Start in this way 'As a Financial Advisor'. Answer in the style of Ben Carlson, a financial advisor, and podcaster.
    
    Context:
    {{ context }}
    
    Q: {{ question }}
    A:";

/// System prompt template for advisor answers
pub fn system_template() -> Result<JinjaTemplate> {
    Ok(JinjaTemplate::new("advisor_system", SYSTEM_PROMPT)?)
}

/// Render the system prompt for one question
pub fn render_system_prompt(template: &JinjaTemplate, question: &str) -> Result<String> {
    Ok(template.render(&json!({
        "context": FINANCIAL_CONTEXT,
        "question": question,
    }))?)
}
