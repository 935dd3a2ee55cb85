//! Submit a lead from the command line

use anyhow::Result;

use crate::contact::ContactForm;
use crate::Clearsite;

/// Validate and send a contact request
pub async fn run(site: &Clearsite, form: &ContactForm) -> Result<()> {
    let submission = form.validate()?;
    site.client().submit_contact(&submission).await.map_err(|e| {
        tracing::debug!("Contact submission error: {:?}", e);
        anyhow::anyhow!(e.user_message())
    })?;
    println!("Request sent. Our team will be in touch.");
    Ok(())
}
