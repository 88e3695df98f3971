// src/services/email_templates.rs

// Corpos HTML dos e-mails de conta. Com o FRONTEND_URL configurado o e-mail leva
// um link para o front-end; sem ele, o token cru e a rota da API a usar.

use super::email::Email;

const SUBJECT_PREFIX: &str = "HR Backend";

pub fn verification_email(to: &str, token: &str, frontend_url: Option<&str>) -> Email {
    let message = match frontend_url {
        Some(base) => {
            let url = format!("{base}/account/verify-email?token={token}");
            format!(
                "<p>Please click the below link to verify your email address:</p>\
                 <p><a href=\"{url}\">{url}</a></p>"
            )
        }
        None => format!(
            "<p>Please use the below token to verify your email address with the \
             <code>/accounts/verify-email</code> api route:</p>\
             <p><code>{token}</code></p>"
        ),
    };

    Email {
        to: to.to_string(),
        subject: format!("{SUBJECT_PREFIX} - Verify Email"),
        html: format!("<h4>Verify Email</h4><p>Thanks for registering!</p>{message}"),
    }
}

pub fn already_registered_email(to: &str, frontend_url: Option<&str>) -> Email {
    let message = match frontend_url {
        Some(base) => format!(
            "<p>If you don't know your password please visit the \
             <a href=\"{base}/account/forgot-password\">forgot password</a> page.</p>"
        ),
        None => "<p>If you don't know your password you can reset it via the \
                 <code>/accounts/forgot-password</code> api route.</p>"
            .to_string(),
    };

    Email {
        to: to.to_string(),
        subject: format!("{SUBJECT_PREFIX} - Email Already Registered"),
        html: format!(
            "<h4>Email Already Registered</h4>\
             <p>Your email <strong>{to}</strong> is already registered.</p>{message}"
        ),
    }
}

pub fn password_reset_email(to: &str, token: &str, frontend_url: Option<&str>) -> Email {
    let message = match frontend_url {
        Some(base) => {
            let url = format!("{base}/account/reset-password?token={token}");
            format!(
                "<p>Please click the below link to reset your password, the link will be valid for 1 day:</p>\
                 <p><a href=\"{url}\">{url}</a></p>"
            )
        }
        None => format!(
            "<p>Please use the below token to reset your password with the \
             <code>/accounts/reset-password</code> api route:</p>\
             <p><code>{token}</code></p>"
        ),
    };

    Email {
        to: to.to_string(),
        subject: format!("{SUBJECT_PREFIX} - Reset Password"),
        html: format!("<h4>Reset Password Email</h4>{message}"),
    }
}
