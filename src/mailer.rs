use crate::error::Error;
use log::info;

// delivery transport lives behind this trait; errors must propagate so the
// calling transaction can roll back instead of committing half-applied state
pub trait Mailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), Error>;
}

pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: &str) -> Self {
        Self { from: from.to_owned() }
    }
}

impl Mailer for LogMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), Error> {
        if to.is_empty() {
            return Err(Error::DeliveryFailure(format!("no recipient for \"{}\"", subject)));
        }
        info!("mail from {} to {} [{}]\n{}", self.from, to, subject, body);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_send() {
        let mailer = LogMailer::new("admin@evoting.com");
        assert!(mailer.send("voter@example.com", "subject", "body").is_ok());
    }

    #[test]
    fn test_send_without_recipient() {
        let mailer = LogMailer::new("admin@evoting.com");
        match mailer.send("", "subject", "body") {
            Err(Error::DeliveryFailure(_)) => {}
            other => panic!("expected delivery failure, got {:?}", other),
        }
    }
}
