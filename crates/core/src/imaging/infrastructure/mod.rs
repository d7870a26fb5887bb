pub mod header_image_probe;
