//! Capture, detect, annotate and persist frames from a camera or stream.
//!
//! Each concern is split into `domain` (ports and pure logic) and
//! `infrastructure` (adapters over ffmpeg, ONNX Runtime and `image`).

pub mod annotation {
    pub mod domain {
        pub mod frame_annotator;
    }
    pub mod infrastructure {
        pub mod box_outline_annotator;
    }
}

pub mod capture {
    pub mod domain {
        pub mod capture_options;
        pub mod frame_source;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod face_detector;
        pub mod model_probe;
    }
    pub mod infrastructure;
}

pub mod enhancement {
    pub mod domain {
        pub mod frame_enhancer;
        pub mod histogram;
    }
    pub mod infrastructure {
        pub mod low_light_enhancer;
    }
}

pub mod output {
    pub mod domain {
        pub mod artifact_namer;
        pub mod image_writer;
    }
    pub mod infrastructure {
        pub mod image_file_writer;
    }
}

pub mod pipeline {
    pub mod capture_loop_use_case;
    pub mod health_check_use_case;
    pub mod pipeline_error;
    pub mod pipeline_logger;
    pub mod region_filter;
    pub mod save_policy;
}

pub mod shared {
    pub mod constants;
    pub mod frame;
    pub mod region;
    pub mod source_descriptor;
    pub mod stream_metadata;
}
