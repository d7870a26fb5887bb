pub mod azure_face_client;
