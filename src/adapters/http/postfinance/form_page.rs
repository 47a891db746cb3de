//! Auto-submitting redirect page for the hosted payment form.

use crate::domain::payment::PaymentRequest;

/// Renders a page that posts `request` to the provider as soon as it loads.
///
/// Browsers without script get a submit button instead.
pub fn render_form_page(request: &PaymentRequest) -> String {
    let mut inputs = String::new();
    for (name, value) in request.form_fields() {
        inputs.push_str(&format!(
            "      <input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
            html_escape(name),
            html_escape(value)
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Redirecting to PostFinance</title>
  </head>
  <body onload="document.getElementById('postfinance-form').submit();">
    <form id="postfinance-form" method="post" action="{action}">
{inputs}      <noscript>
        <p>Please continue to the payment page.</p>
        <button type="submit">Continue</button>
      </noscript>
    </form>
  </body>
</html>
"#,
        action = html_escape(request.gateway_url()),
        inputs = inputs,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
