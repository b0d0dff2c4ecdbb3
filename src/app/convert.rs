pub mod xmind2testcase;
