use crate::detection::domain::face::Face;
use crate::detection::domain::face_grouper::FaceGrouper;
use crate::detection::domain::face_service_error::FaceServiceError;
use crate::detection::domain::photo_batch::PhotoBatch;

/// Faces of the person seen most often across the batch.
///
/// With zero or one face there is nothing to group, so the remote service
/// is not called. Otherwise the grouper decides; see
/// [`FaceGrouping::most_common`](crate::detection::domain::face_grouper::FaceGrouping::most_common)
/// for the selection policy.
pub fn common_faces<'a>(
    batch: &'a PhotoBatch,
    grouper: &dyn FaceGrouper,
) -> Result<Vec<&'a Face>, FaceServiceError> {
    let faces: Vec<&Face> = batch.faces().collect();
    let ids: Vec<String> = faces.iter().map(|f| f.id().to_string()).collect();

    if ids.len() <= 1 {
        return Ok(faces_by_ids(&ids, &faces));
    }

    let grouping = grouper.group(&ids)?;
    log::debug!(
        "Grouped {} faces into {} group(s), {} unclustered",
        ids.len(),
        grouping.groups.len(),
        grouping.messy_group.len()
    );
    Ok(faces_by_ids(&grouping.most_common(), &faces))
}

/// Looks up faces by identity, following the order of `ids`.
///
/// Unknown identities are skipped. Every face matching an identity is
/// returned.
pub fn faces_by_ids<'a>(ids: &[String], faces: &[&'a Face]) -> Vec<&'a Face> {
    ids.iter()
        .flat_map(|id| faces.iter().copied().filter(move |f| f.id() == id))
        .collect()
}
