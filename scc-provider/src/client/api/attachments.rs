use crate::client::{ApiRequest, SccClient, instance_path, segment};
use crate::error::{ApiError, ApiResult};
use crate::models::{AttachmentPrototype, ProfileAttachment};

fn attachment_path(instance_id: &str, profile_id: &str, attachment_id: &str) -> String {
    instance_path(
        instance_id,
        &format!("/profiles/{}/attachments/{}", segment(profile_id), segment(attachment_id)),
    )
}

impl SccClient {
    /// Create one attachment. The service takes and returns a batch.
    pub async fn create_profile_attachment(
        &self,
        instance_id: &str,
        profile_id: &str,
        attachment: &ProfileAttachment,
    ) -> ApiResult<ProfileAttachment> {
        let prototype = AttachmentPrototype {
            profile_id: Some(profile_id.to_string()),
            attachments: vec![attachment.clone()],
        };
        let path = format!("/profiles/{}/attachments", segment(profile_id));
        let request = ApiRequest::post(instance_path(instance_id, &path)).with_body(&prototype)?;
        let created: AttachmentPrototype = self.send_json(request).await?;
        created.attachments.into_iter().next().ok_or_else(|| {
            ApiError::InvalidResponse("Create attachment returned no attachments".to_string())
        })
    }

    pub async fn list_profile_attachments(
        &self,
        instance_id: &str,
        profile_id: &str,
    ) -> ApiResult<Vec<ProfileAttachment>> {
        let path = format!("/profiles/{}/attachments", segment(profile_id));
        self.collect_pages(ApiRequest::get(instance_path(instance_id, &path)), "attachments")
            .await
    }

    pub async fn get_profile_attachment(
        &self,
        instance_id: &str,
        profile_id: &str,
        attachment_id: &str,
    ) -> ApiResult<ProfileAttachment> {
        let path = attachment_path(instance_id, profile_id, attachment_id);
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn replace_profile_attachment(
        &self,
        instance_id: &str,
        profile_id: &str,
        attachment_id: &str,
        attachment: &ProfileAttachment,
    ) -> ApiResult<ProfileAttachment> {
        let path = attachment_path(instance_id, profile_id, attachment_id);
        self.send_json(ApiRequest::put(path).with_body(attachment)?)
            .await
    }

    pub async fn delete_profile_attachment(
        &self,
        instance_id: &str,
        profile_id: &str,
        attachment_id: &str,
    ) -> ApiResult<()> {
        let path = attachment_path(instance_id, profile_id, attachment_id);
        self.send(ApiRequest::delete(path)).await?;
        Ok(())
    }
}
